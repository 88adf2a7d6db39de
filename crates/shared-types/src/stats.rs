//! Derived per-document compliance statistics.
//!
//! Stats are always recomputed from the verdict and risk lists; they
//! are never a source of truth on their own.

use serde::{Deserialize, Serialize};

use crate::types::{RiskExplanation, Severity, VerificationResult};

/// Per-document compliance counters.
///
/// `compliant_count + non_compliant_count == total_clauses` holds for
/// any value built by [`ComplianceStats::from_lists`]. The severity
/// counts sum to at most `total_clauses` (a clause carries zero or one
/// risk explanation). `compliance_rate` is a 0-100 percentage rounded
/// to two decimals, `0.0` when there are no clauses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceStats {
    pub total_clauses: usize,
    pub compliant_count: usize,
    pub non_compliant_count: usize,
    pub high_risk_count: usize,
    pub medium_risk_count: usize,
    pub low_risk_count: usize,
    pub compliance_rate: f64,
}

impl ComplianceStats {
    /// Zeroed stats for a document with no clauses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Stats for a degraded evaluation: the clause count is known but
    /// nothing was verified, so every other counter stays zero.
    pub fn unevaluated(total_clauses: usize) -> Self {
        Self {
            total_clauses,
            ..Self::default()
        }
    }

    /// Derive stats from positionally aligned verdict and risk lists.
    pub fn from_lists(
        verification_results: &[VerificationResult],
        risk_explanations: &[Option<RiskExplanation>],
    ) -> Self {
        let total_clauses = verification_results.len();
        let compliant_count = verification_results
            .iter()
            .filter(|r| r.is_compliant)
            .count();
        let non_compliant_count = total_clauses - compliant_count;

        let count_severity = |severity: Severity| {
            risk_explanations
                .iter()
                .filter(|r| r.as_ref().is_some_and(|r| r.severity == severity))
                .count()
        };

        let compliance_rate = if total_clauses > 0 {
            round2(compliant_count as f64 / total_clauses as f64 * 100.0)
        } else {
            0.0
        };

        Self {
            total_clauses,
            compliant_count,
            non_compliant_count,
            high_risk_count: count_severity(Severity::High),
            medium_risk_count: count_severity(Severity::Medium),
            low_risk_count: count_severity(Severity::Low),
            compliance_rate,
        }
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to one decimal place, the precision dashboard views display.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
