use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stats::ComplianceStats;

/// Lifecycle state of an uploaded document.
///
/// Transitions are owned by the upload pipeline: `Started` at upload,
/// then `Completed` or `Failed`. A record stuck in `Started` is the
/// visible trace of a crashed upload and is deliberately never cleaned
/// up automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Started,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStatus::Started => write!(f, "started"),
            ProcessingStatus::Processing => write!(f, "processing"),
            ProcessingStatus::Completed => write!(f, "completed"),
            ProcessingStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Risk severity bucket for a flagged clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::High => write!(f, "High"),
            Severity::Medium => write!(f, "Medium"),
            Severity::Low => write!(f, "Low"),
        }
    }
}

/// Metadata record for one document, keyed by `document_id`.
///
/// The compliance counters are denormalized onto the metadata record at
/// completion so dashboard scans never have to load full results. The
/// stored results remain the source of truth; [`ComplianceStats`] can
/// always be recomputed from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub document_id: String,
    pub filename: String,
    pub file_size: u64,
    pub content_type: String,
    pub language: String,
    pub file_hash: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub processed_at: Option<DateTime<Utc>>,
    pub processing_status: ProcessingStatus,
    #[serde(default)]
    pub total_clauses: usize,
    #[serde(default)]
    pub compliant_count: usize,
    #[serde(default)]
    pub non_compliant_count: usize,
    #[serde(default)]
    pub high_risk_count: usize,
    #[serde(default)]
    pub medium_risk_count: usize,
    #[serde(default)]
    pub low_risk_count: usize,
    #[serde(default)]
    pub compliance_rate: f64,
    #[serde(default)]
    pub overall_score: f64,
}

impl DocumentMetadata {
    /// Fresh metadata for a just-received upload, status `Started`,
    /// all counters zeroed.
    #[allow(clippy::too_many_arguments)]
    pub fn started(
        document_id: String,
        filename: String,
        file_size: u64,
        content_type: String,
        language: String,
        file_hash: String,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            document_id,
            filename,
            file_size,
            content_type,
            language,
            file_hash,
            uploaded_at,
            processed_at: None,
            processing_status: ProcessingStatus::Started,
            total_clauses: 0,
            compliant_count: 0,
            non_compliant_count: 0,
            high_risk_count: 0,
            medium_risk_count: 0,
            low_risk_count: 0,
            compliance_rate: 0.0,
            overall_score: 0.0,
        }
    }

    /// Mark the document completed and copy the derived counters onto
    /// the record.
    pub fn complete(&mut self, stats: &ComplianceStats, at: DateTime<Utc>) {
        self.processing_status = ProcessingStatus::Completed;
        self.processed_at = Some(at);
        self.total_clauses = stats.total_clauses;
        self.compliant_count = stats.compliant_count;
        self.non_compliant_count = stats.non_compliant_count;
        self.high_risk_count = stats.high_risk_count;
        self.medium_risk_count = stats.medium_risk_count;
        self.low_risk_count = stats.low_risk_count;
        self.compliance_rate = stats.compliance_rate;
        self.overall_score = stats.compliance_rate;
    }

    /// Timestamp a dashboard view should attribute activity to:
    /// completion time when known, upload time otherwise.
    pub fn activity_at(&self) -> DateTime<Utc> {
        self.processed_at.unwrap_or(self.uploaded_at)
    }
}

/// One discrete compliance-relevant statement extracted from a
/// document. Identity is positional: `(document_id, ordinal)`; the
/// `clause_id` carries the ordinal as `"C-1"`, `"C-2"`, ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    #[serde(rename = "clause_id")]
    pub id: String,
    pub text_en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_original: Option<String>,
}

/// A candidate regulatory rule the classifier weighed against a clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedRule {
    pub rule: String,
    pub is_relevant: bool,
    pub reason: String,
}

/// Compliance verdict for one clause, positionally aligned with the
/// clause list it was produced from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub is_compliant: bool,
    pub final_reason: String,
    #[serde(default)]
    pub matched_rules: Vec<MatchedRule>,
    #[serde(default, alias = "Section", skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

/// Severity-graded impact/mitigation narrative for a risky clause.
/// Absent (`None` in the aligned list) when no risk was flagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskExplanation {
    pub severity: Severity,
    pub risk_score: u32,
    pub category: String,
    pub impact: String,
    pub mitigation: String,
}

/// Whether an evaluation ran to completion or fell back to a labeled
/// degraded result after a classifier failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Evaluated,
    Degraded,
}

/// Output of one compliance evaluation over a clause list.
///
/// Invariant for `Evaluated` reports:
/// `verification_results.len() == risk_explanations.len() == clause count`.
/// `Degraded` reports carry empty lists plus the original clause count
/// inside `compliance_stats` so callers can still render zeroed figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub status: EvaluationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub verification_results: Vec<VerificationResult>,
    pub risk_explanations: Vec<Option<RiskExplanation>>,
    pub compliance_stats: ComplianceStats,
}

/// One chronological period extracted by the summarizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePeriod {
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    pub description: String,
}

/// Structured draft produced by normalizing the summarizer's raw
/// response. The summarizer capitalizes some keys (`Clauses`,
/// `Timelines`), hence the aliases. `processing_error` is set only when
/// the response could not be parsed and the fixed fallback was used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryDraft {
    #[serde(default, alias = "Summary")]
    pub summary: String,
    #[serde(default, alias = "Clauses")]
    pub clauses: Vec<Clause>,
    #[serde(default, alias = "Timelines")]
    pub timelines: BTreeMap<String, TimelinePeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_error: Option<String>,
}

/// Full processing output persisted per document alongside its
/// metadata record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResults {
    pub document_id: String,
    pub summary: String,
    pub clauses: Vec<Clause>,
    pub timelines: BTreeMap<String, TimelinePeriod>,
    #[serde(rename = "compliance_results")]
    pub compliance: ComplianceReport,
    pub processing_completed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_roundtrips_as_snake_case() {
        let json = serde_json::to_string(&ProcessingStatus::Started).unwrap();
        assert_eq!(json, "\"started\"");
        let back: ProcessingStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(back, ProcessingStatus::Completed);
    }

    #[test]
    fn severity_serializes_capitalized() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"High\"");
        assert_eq!(Severity::Medium.to_string(), "Medium");
    }

    #[test]
    fn clause_uses_wire_field_names() {
        let clause: Clause =
            serde_json::from_str(r#"{"clause_id": "C-1", "text_en": "All fees are disclosed."}"#)
                .unwrap();
        assert_eq!(clause.id, "C-1");
        assert_eq!(clause.text_original, None);

        let json = serde_json::to_value(&clause).unwrap();
        assert_eq!(json["clause_id"], "C-1");
    }

    #[test]
    fn draft_accepts_capitalized_summarizer_keys() {
        let raw = r#"{
            "summary": "s",
            "Clauses": [{"clause_id": "C-1", "text_en": "t"}],
            "Timelines": {"timeline1": {"start": "2001", "end": null, "description": "d"}}
        }"#;
        let draft: SummaryDraft = serde_json::from_str(raw).unwrap();
        assert_eq!(draft.clauses.len(), 1);
        assert_eq!(draft.timelines["timeline1"].start, "2001");
        assert_eq!(draft.processing_error, None);
    }

    #[test]
    fn verification_result_tolerates_extra_keys() {
        let raw = r#"{
            "clause": "ignored",
            "is_compliant": false,
            "final_reason": "conflicts with disclosure rules",
            "matched_rules": [{"rule": "R-1", "metadata": {}, "is_relevant": true, "reason": "r"}],
            "Section": "Banking"
        }"#;
        let result: VerificationResult = serde_json::from_str(raw).unwrap();
        assert!(!result.is_compliant);
        assert_eq!(result.section.as_deref(), Some("Banking"));
        assert_eq!(result.matched_rules.len(), 1);
    }

    #[test]
    fn complete_copies_stats_onto_metadata() {
        let mut meta = DocumentMetadata::started(
            "doc_1".into(),
            "a.pdf".into(),
            10,
            "application/pdf".into(),
            "English".into(),
            "hash".into(),
            Utc::now(),
        );
        let stats = ComplianceStats {
            total_clauses: 3,
            compliant_count: 2,
            non_compliant_count: 1,
            high_risk_count: 1,
            medium_risk_count: 0,
            low_risk_count: 0,
            compliance_rate: 66.67,
        };
        let at = Utc::now();
        meta.complete(&stats, at);

        assert_eq!(meta.processing_status, ProcessingStatus::Completed);
        assert_eq!(meta.processed_at, Some(at));
        assert_eq!(meta.total_clauses, 3);
        assert_eq!(meta.overall_score, 66.67);
        assert_eq!(meta.activity_at(), at);
    }
}
