//! Response models for the compliance API. Dashboard-facing shapes are
//! camelCase; storage records keep their snake_case form.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared_types::stats::round2;
use shared_types::{
    Clause, ComplianceReport, DocumentMetadata, ProcessingResults, ProcessingStatus,
    RiskExplanation, Severity, TimelinePeriod, VerificationResult,
};

/// Service banner for the root endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointInfo {
    pub path: &'static str,
    pub method: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

/// `{"status": "success", "data": ...}` envelope.
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

/// List envelope carrying the total alongside the items.
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    pub status: &'static str,
    pub data: Vec<T>,
    pub total: usize,
}

impl<T> ListResponse<T> {
    pub fn success(data: Vec<T>) -> Self {
        let total = data.len();
        Self {
            status: "success",
            data,
            total,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsResponse {
    pub status: &'static str,
    pub data: Vec<analytics_engine::Notification>,
    pub unread_count: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub success: bool,
    pub document_id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearAllResponse {
    pub success: bool,
    pub message: String,
    pub deleted_count: usize,
    pub timestamp: DateTime<Utc>,
}

/// Card shown in the dashboard document list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub id: String,
    pub file_name: String,
    pub file_size: String,
    pub uploaded_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub summary: String,
    pub overall_score: f64,
    pub risk_level: &'static str,
    pub total_clauses: usize,
    pub compliant_clauses: usize,
    pub non_compliant_clauses: usize,
    pub high_risk_clauses: usize,
    pub medium_risk_clauses: usize,
    pub low_risk_clauses: usize,
    pub compliance_rate: f64,
    pub status: ProcessingStatus,
    pub language: String,
    pub content_type: String,
}

impl DocumentInfo {
    pub fn from_metadata(meta: &DocumentMetadata) -> Self {
        Self {
            id: meta.document_id.clone(),
            file_name: meta.filename.clone(),
            file_size: format_file_size(meta.file_size),
            uploaded_at: meta.uploaded_at,
            processed_at: meta.processed_at,
            summary: format!(
                "Document processed with {} clauses. Compliance rate: {}%",
                meta.total_clauses, meta.compliance_rate
            ),
            overall_score: meta.overall_score,
            risk_level: analytics_engine::views::document_card_risk_level(
                meta.high_risk_count,
                meta.medium_risk_count,
                meta.compliance_rate,
            ),
            total_clauses: meta.total_clauses,
            compliant_clauses: meta.compliant_count,
            non_compliant_clauses: meta.non_compliant_count,
            high_risk_clauses: meta.high_risk_count,
            medium_risk_clauses: meta.medium_risk_count,
            low_risk_clauses: meta.low_risk_count,
            compliance_rate: meta.compliance_rate,
            status: meta.processing_status,
            language: meta.language.clone(),
            content_type: meta.content_type.clone(),
        }
    }
}

/// One clause of the single-document analysis view, joined with its
/// positional verdict and risk explanation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedClause {
    pub id: String,
    pub text: String,
    pub is_compliant: bool,
    pub risk_level: String,
    pub risk_score: u32,
    pub category: String,
    pub explanation: String,
    pub impact: String,
    pub mitigation: String,
    pub matched_rules: Vec<shared_types::MatchedRule>,
}

impl EnhancedClause {
    pub fn build(
        index: usize,
        clause: &Clause,
        verdict: Option<&VerificationResult>,
        risk: Option<&RiskExplanation>,
    ) -> Self {
        Self {
            id: format!("clause_{}", index + 1),
            text: clause.text_en.clone(),
            is_compliant: verdict.map(|v| v.is_compliant).unwrap_or(false),
            risk_level: risk
                .map(|r| r.severity.to_string().to_lowercase())
                .unwrap_or_else(|| "unknown".to_string()),
            risk_score: risk.map(|r| r.risk_score).unwrap_or(0),
            category: risk
                .map(|r| r.category.clone())
                .unwrap_or_else(|| "General".to_string()),
            explanation: verdict
                .map(|v| v.final_reason.clone())
                .unwrap_or_else(|| "Analysis completed".to_string()),
            impact: risk
                .map(|r| r.impact.clone())
                .unwrap_or_else(|| "No specific impact identified".to_string()),
            mitigation: risk
                .map(|r| r.mitigation.clone())
                .unwrap_or_else(|| "Review recommended".to_string()),
            matched_rules: verdict.map(|v| v.matched_rules.clone()).unwrap_or_default(),
        }
    }
}

/// Full single-document analysis view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisData {
    pub id: String,
    pub file_name: String,
    pub file_size: String,
    pub uploaded_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub summary: String,
    pub overall_score: f64,
    pub compliance_rate: f64,
    pub total_clauses: usize,
    pub compliant_clauses: usize,
    pub non_compliant_clauses: usize,
    pub high_risk_clauses: usize,
    pub medium_risk_clauses: usize,
    pub low_risk_clauses: usize,
    pub risk_level: &'static str,
    pub status: ProcessingStatus,
    pub language: String,
    pub content_type: String,
    pub clauses: Vec<EnhancedClause>,
    pub timelines: BTreeMap<String, TimelinePeriod>,
    #[serde(rename = "compliance_results")]
    pub compliance: ComplianceReport,
    pub processing_completed_at: DateTime<Utc>,
}

impl AnalysisData {
    pub fn build(meta: &DocumentMetadata, results: &ProcessingResults) -> Self {
        let stats = &results.compliance.compliance_stats;
        let clauses = results
            .clauses
            .iter()
            .enumerate()
            .map(|(i, clause)| {
                EnhancedClause::build(
                    i,
                    clause,
                    results.compliance.verification_results.get(i),
                    results
                        .compliance
                        .risk_explanations
                        .get(i)
                        .and_then(|r| r.as_ref()),
                )
            })
            .collect();

        Self {
            id: meta.document_id.clone(),
            file_name: meta.filename.clone(),
            file_size: format_file_size(meta.file_size),
            uploaded_at: meta.uploaded_at,
            processed_at: meta.processed_at,
            summary: results.summary.clone(),
            overall_score: stats.compliance_rate,
            compliance_rate: stats.compliance_rate,
            total_clauses: results.clauses.len(),
            compliant_clauses: stats.compliant_count,
            non_compliant_clauses: stats.non_compliant_count,
            high_risk_clauses: stats.high_risk_count,
            medium_risk_clauses: stats.medium_risk_count,
            low_risk_clauses: stats.low_risk_count,
            risk_level: if stats.high_risk_count > 0 {
                "high"
            } else if stats.medium_risk_count > 0 {
                "medium"
            } else {
                "low"
            },
            status: meta.processing_status,
            language: meta.language.clone(),
            content_type: meta.content_type.clone(),
            clauses,
            timelines: results.timelines.clone(),
            compliance: results.compliance.clone(),
            processing_completed_at: results.processing_completed_at,
        }
    }
}

/// On-demand re-analysis of a stored document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReanalysisReport {
    pub document_id: String,
    pub filename: String,
    pub analysis_timestamp: DateTime<Utc>,
    pub compliance_analysis: ComplianceAnalysis,
    pub risk_assessment: RiskAssessment,
    pub detailed_results: DetailedResults,
    pub processing_status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceAnalysis {
    pub total_clauses: usize,
    pub compliant_clauses: usize,
    pub non_compliant_clauses: usize,
    pub compliance_rate: f64,
    pub high_risk_clauses: usize,
    pub medium_risk_clauses: usize,
    pub low_risk_clauses: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub overall_risk_score: f64,
    pub risk_level: Severity,
    pub risk_factors: Vec<Option<RiskExplanation>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedResults {
    pub verification_results: Vec<VerificationResult>,
    pub risk_explanations: Vec<Option<RiskExplanation>>,
    pub extracted_clauses: Vec<Clause>,
}

/// Human-readable size: bytes as megabytes with two decimals.
fn format_file_size(bytes: u64) -> String {
    format!("{} MB", round2(bytes as f64 / (1024.0 * 1024.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn file_sizes_render_in_megabytes() {
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(1572864), "1.5 MB");
        assert_eq!(format_file_size(0), "0 MB");
    }

    #[test]
    fn enhanced_clause_defaults_when_risk_is_absent() {
        let clause = Clause {
            id: "C-1".into(),
            text_en: "text".into(),
            text_original: None,
        };
        let verdict = VerificationResult {
            is_compliant: true,
            final_reason: "no conflicts".into(),
            matched_rules: Vec::new(),
            section: None,
        };
        let enhanced = EnhancedClause::build(0, &clause, Some(&verdict), None);

        assert_eq!(enhanced.id, "clause_1");
        assert_eq!(enhanced.risk_level, "unknown");
        assert_eq!(enhanced.category, "General");
        assert_eq!(enhanced.explanation, "no conflicts");
        assert_eq!(enhanced.mitigation, "Review recommended");
    }

    #[test]
    fn enhanced_clause_carries_risk_details() {
        let clause = Clause {
            id: "C-1".into(),
            text_en: "text".into(),
            text_original: None,
        };
        let verdict = VerificationResult {
            is_compliant: false,
            final_reason: "violates disclosure rule".into(),
            matched_rules: Vec::new(),
            section: None,
        };
        let risk = RiskExplanation {
            severity: Severity::High,
            risk_score: 9,
            category: "Legal".into(),
            impact: "Legal risk (high) detected.".into(),
            mitigation: "Review and address compliance gap immediately.".into(),
        };
        let enhanced = EnhancedClause::build(2, &clause, Some(&verdict), Some(&risk));

        assert_eq!(enhanced.id, "clause_3");
        assert_eq!(enhanced.risk_level, "high");
        assert_eq!(enhanced.risk_score, 9);
        assert!(!enhanced.is_compliant);
    }
}
