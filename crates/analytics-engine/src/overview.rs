//! Dashboard overview and corpus risk distribution.

use shared_types::stats::round1;
use shared_types::{DocumentMetadata, ProcessingStatus};

use crate::views::{DashboardOverview, RecentUpload, RiskDistribution};

/// Per-document synthesized processing time, in milliseconds. The
/// store records no durations, so the dashboard estimates from clause
/// risk: riskier documents spend longer in classification.
fn estimated_processing_ms(doc: &DocumentMetadata) -> u64 {
    2000 + doc.high_risk_count as u64 * 500
}

/// Compute the dashboard overview. A pure function of the input slice;
/// the compliance rate is the mean of per-document rates, weighted
/// equally per document, not per clause.
pub fn overview(docs: &[DocumentMetadata]) -> DashboardOverview {
    let completed: Vec<&DocumentMetadata> = docs
        .iter()
        .filter(|d| d.processing_status == ProcessingStatus::Completed)
        .collect();

    let compliance_rate = if completed.is_empty() {
        0.0
    } else {
        round1(completed.iter().map(|d| d.compliance_rate).sum::<f64>() / completed.len() as f64)
    };

    let avg_processing_time_ms = if completed.is_empty() {
        0
    } else {
        completed
            .iter()
            .map(|d| estimated_processing_ms(d))
            .sum::<u64>()
            / completed.len() as u64
    };

    let mut recent_uploads: Vec<RecentUpload> = docs
        .iter()
        .map(|d| RecentUpload {
            document_id: d.document_id.clone(),
            filename: d.filename.clone(),
            uploaded_at: d.uploaded_at,
            status: d.processing_status,
        })
        .collect();
    recent_uploads.sort_by(|a, b| {
        b.uploaded_at
            .cmp(&a.uploaded_at)
            .then_with(|| a.document_id.cmp(&b.document_id))
    });
    recent_uploads.truncate(5);

    DashboardOverview {
        total_documents: docs.len(),
        processed_documents: completed.len(),
        compliance_rate,
        average_score: compliance_rate,
        high_risk_documents: completed.iter().filter(|d| d.high_risk_count > 0).count(),
        compliant_documents: completed
            .iter()
            .filter(|d| d.compliance_rate >= 80.0)
            .count(),
        avg_processing_time_ms,
        recent_uploads,
    }
}

/// Sum clause-level severity counts across completed documents, and
/// count documents compliant outright (rate >= 90).
pub fn risk_distribution(docs: &[DocumentMetadata]) -> RiskDistribution {
    let mut dist = RiskDistribution::default();
    for doc in docs {
        if doc.processing_status != ProcessingStatus::Completed {
            continue;
        }
        dist.high += doc.high_risk_count;
        dist.medium += doc.medium_risk_count;
        dist.low += doc.low_risk_count;
        if doc.compliance_rate >= 90.0 {
            dist.compliant += 1;
        }
    }
    dist
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn overview_averages_per_document_not_per_clause() {
        let docs = vec![
            completed_doc("doc_a", 1, 90.0, 0, 0, 0),
            completed_doc("doc_b", 2, 50.0, 2, 1, 0),
            started_doc("doc_c", 0),
        ];
        let view = overview(&docs);

        assert_eq!(view.total_documents, 3);
        assert_eq!(view.processed_documents, 2);
        assert_eq!(view.compliance_rate, 70.0);
        assert_eq!(view.average_score, 70.0);
        assert_eq!(view.high_risk_documents, 1);
        assert_eq!(view.compliant_documents, 1);
        // (2000 + (2000 + 2*500)) / 2
        assert_eq!(view.avg_processing_time_ms, 2500);
    }

    #[test]
    fn overview_of_empty_corpus_is_zeroed() {
        let view = overview(&[]);
        assert_eq!(view.total_documents, 0);
        assert_eq!(view.compliance_rate, 0.0);
        assert_eq!(view.avg_processing_time_ms, 0);
        assert!(view.recent_uploads.is_empty());
    }

    #[test]
    fn recent_uploads_are_newest_first_and_capped() {
        let docs: Vec<_> = (0..8)
            .map(|i| completed_doc(&format!("doc_{i}"), i, 80.0, 0, 0, 0))
            .collect();
        let view = overview(&docs);

        assert_eq!(view.recent_uploads.len(), 5);
        assert_eq!(view.recent_uploads[0].document_id, "doc_0");
        assert_eq!(view.recent_uploads[4].document_id, "doc_4");
    }

    #[test]
    fn overview_is_idempotent() {
        let docs = vec![
            completed_doc("doc_a", 1, 88.5, 1, 2, 3),
            started_doc("doc_b", 0),
        ];
        let first = serde_json::to_string(&overview(&docs)).unwrap();
        let second = serde_json::to_string(&overview(&docs)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn distribution_sums_clause_counts_and_counts_compliant_docs() {
        let docs = vec![
            completed_doc("doc_a", 1, 95.0, 1, 2, 0),
            completed_doc("doc_b", 2, 92.0, 0, 1, 4),
            completed_doc("doc_c", 3, 40.0, 3, 0, 0),
            started_doc("doc_d", 0),
        ];
        let dist = risk_distribution(&docs);

        assert_eq!(dist.high, 4);
        assert_eq!(dist.medium, 3);
        assert_eq!(dist.low, 4);
        assert_eq!(dist.compliant, 2);
    }
}
