//! Keyword-corpus risk grading for non-compliant clauses.
//!
//! Grading is deterministic: the matched-rule text of a failed verdict
//! is scanned against per-category severity bands, first hit wins.
//! Categories and bands are checked in declaration order, lowest
//! severity first within a category, so a clause touching both a
//! routine and a severe topic is graded by the first band that names
//! it.

use shared_types::{ComplianceStats, RiskExplanation, Severity, VerificationResult};

struct RiskBand {
    severity: Severity,
    label: &'static str,
    score: u32,
    keywords: &'static [&'static str],
}

struct RiskCategory {
    name: &'static str,
    bands: &'static [RiskBand],
}

static RISK_CORPUS: &[RiskCategory] = &[
    RiskCategory {
        name: "Legal",
        bands: &[
            RiskBand {
                severity: Severity::Low,
                label: "low",
                score: 3,
                keywords: &[
                    "data retention",
                    "email consent",
                    "basic disclosure",
                    "cookie banner",
                    "age verification",
                    "opt-in form",
                    "advertising guidelines",
                    "copyright notice",
                    "privacy notice",
                    "employee conduct",
                    "whistleblower",
                    "training requirement",
                    "website policy",
                    "privacy shield",
                    "standard contractual clause",
                    "basic nda",
                    "intellectual property marking",
                    "brand usage",
                    "simple contract clause",
                    "minor compliance update",
                ],
            },
            RiskBand {
                severity: Severity::Medium,
                label: "medium",
                score: 6,
                keywords: &[
                    "hipaa",
                    "sox",
                    "pci dss",
                    "consumer protection",
                    "cross-border data transfer",
                    "sensitive personal data",
                    "data subject rights",
                    "informed consent",
                    "retention limits",
                    "audit obligation",
                    "non-compete",
                    "breach of contract",
                    "export control",
                    "aml (anti money laundering)",
                    "licensing terms",
                    "gdpr dpia",
                    "standard of care",
                    "industry compliance",
                    "governance policy",
                    "harassment law",
                ],
            },
            RiskBand {
                severity: Severity::High,
                label: "high",
                score: 9,
                keywords: &[
                    "gdpr",
                    "ccpa",
                    "antitrust",
                    "competition law",
                    "bribery",
                    "corruption",
                    "criminal liability",
                    "environmental violation",
                    "trade secrets theft",
                    "fraud",
                    "fcpa",
                    "money laundering",
                    "sanctions violation",
                    "terrorism financing",
                    "child protection law",
                    "discrimination",
                    "illegal surveillance",
                    "human rights violation",
                    "insider trading",
                ],
            },
        ],
    },
    RiskCategory {
        name: "Financial",
        bands: &[
            RiskBand {
                severity: Severity::Low,
                label: "low",
                score: 2,
                keywords: &[
                    "late payment",
                    "small fines",
                    "bank reconciliation",
                    "reporting error",
                    "clerical error",
                    "budget overrun",
                    "low-value transaction",
                    "delayed invoice",
                    "currency rounding",
                    "operational fee",
                    "petty cash",
                    "minor audit finding",
                    "tax filing delay",
                    "mislabelled expense",
                    "duplicate entry",
                    "simple variance",
                    "low materiality",
                    "accounting correction",
                    "vendor misreport",
                    "invoice mismatch",
                    "expense approval",
                ],
            },
            RiskBand {
                severity: Severity::Medium,
                label: "medium",
                score: 6,
                keywords: &[
                    "tax evasion suspicion",
                    "aml alert",
                    "financial reporting",
                    "capital adequacy",
                    "unsecured loan",
                    "medium-value fraud",
                    "internal audit fail",
                    "sox non-compliance",
                    "credit rating impact",
                    "hedging loss",
                    "currency risk",
                    "insurance lapse",
                    "payment system breach",
                    "misrepresentation",
                    "loan covenant breach",
                    "fraudulent invoice",
                    "deferred revenue issue",
                    "derivatives misstatement",
                    "suspicious transfer",
                    "foreign exchange loss",
                ],
            },
            RiskBand {
                severity: Severity::High,
                label: "high",
                score: 10,
                keywords: &[
                    "money laundering",
                    "securities fraud",
                    "embezzlement",
                    "bankruptcy",
                    "ponzi scheme",
                    "financial crime",
                    "tax fraud",
                    "insider trading",
                    "terrorist financing",
                    "capital market manipulation",
                    "bribery fund",
                    "illegal investment scheme",
                    "sanctions breach",
                    "shadow banking",
                    "large-scale fraud",
                    "regulatory fine",
                    "stock manipulation",
                    "false accounting",
                    "loan sharking",
                    "bond default",
                ],
            },
        ],
    },
    RiskCategory {
        name: "Operational",
        bands: &[
            RiskBand {
                severity: Severity::Low,
                label: "low",
                score: 2,
                keywords: &[
                    "delayed delivery",
                    "staff absence",
                    "machine downtime",
                    "workplace safety note",
                    "minor it outage",
                    "low-value procurement",
                    "non-critical defect",
                    "small process gap",
                    "customer complaint",
                    "service delay",
                    "shift absence",
                    "supply hiccup",
                    "reporting lag",
                    "maintenance miss",
                    "lost document",
                    "email misrouting",
                    "meeting delay",
                    "training lapse",
                    "manual error",
                    "low priority backlog",
                ],
            },
            RiskBand {
                severity: Severity::Medium,
                label: "medium",
                score: 5,
                keywords: &[
                    "data breach",
                    "service outage",
                    "operational fraud",
                    "cybersecurity gap",
                    "vendor failure",
                    "compliance gap",
                    "medium downtime",
                    "untrained staff",
                    "supply chain risk",
                    "system vulnerability",
                    "policy violation",
                    "unauthorized access",
                    "payment delay",
                    "fraud detection miss",
                    "incomplete audit trail",
                    "incorrect reporting",
                    "kyc failure",
                    "license lapse",
                    "safety breach",
                    "medium-scale disruption",
                ],
            },
            RiskBand {
                severity: Severity::High,
                label: "high",
                score: 9,
                keywords: &[
                    "ransomware",
                    "system hack",
                    "major data breach",
                    "identity theft",
                    "critical infrastructure failure",
                    "regulatory shutdown",
                    "large-scale fraud",
                    "supply chain collapse",
                    "factory shutdown",
                    "nation-state attack",
                    "major service outage",
                    "cyber espionage",
                    "unauthorized disclosure",
                    "operational sabotage",
                    "environmental spill",
                    "toxic release",
                    "industrial accident",
                    "mass casualty",
                ],
            },
        ],
    },
];

/// Converts compliance verdicts into business-oriented risk
/// assessments with severity, category, impact, and mitigation.
#[derive(Debug, Default, Clone, Copy)]
pub struct RiskExplainer;

impl RiskExplainer {
    pub fn new() -> Self {
        Self
    }

    /// Grade one verdict. Compliant clauses carry no risk; a failed
    /// verdict whose rule text matches no corpus keyword also returns
    /// `None` (no category identified, not "no risk evaluated").
    pub fn explain(&self, result: &VerificationResult) -> Option<RiskExplanation> {
        if result.is_compliant {
            return None;
        }

        let matched_text = result
            .matched_rules
            .iter()
            .map(|r| r.rule.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        for category in RISK_CORPUS {
            for band in category.bands {
                if band.keywords.iter().any(|k| matched_text.contains(k)) {
                    return Some(RiskExplanation {
                        severity: band.severity,
                        risk_score: band.score,
                        category: category.name.to_string(),
                        impact: format!("{} risk ({}) detected.", category.name, band.label),
                        mitigation: "Review and address compliance gap immediately.".to_string(),
                    });
                }
            }
        }
        None
    }

    /// Grade a verdict list, one aligned slot per entry.
    pub fn explain_all(&self, results: &[VerificationResult]) -> Vec<Option<RiskExplanation>> {
        results.iter().map(|r| self.explain(r)).collect()
    }
}

/// Severity-weighted roll-up of one document's risk counts, as a 0-100
/// score: high clauses weigh 3, medium 2, low 1, against the maximum
/// of 3 per clause.
pub fn document_risk_score(stats: &ComplianceStats) -> f64 {
    let max_possible = stats.total_clauses * 3;
    if max_possible == 0 {
        return 0.0;
    }
    let weighted =
        stats.high_risk_count * 3 + stats.medium_risk_count * 2 + stats.low_risk_count;
    shared_types::stats::round2(weighted as f64 / max_possible as f64 * 100.0)
}

/// Bucket a roll-up score into a document-level risk grade.
pub fn document_risk_level(score: f64) -> Severity {
    if score > 70.0 {
        Severity::High
    } else if score > 40.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}
