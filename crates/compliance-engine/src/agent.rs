//! Evaluation of a document's clause list.

use std::sync::Arc;

use futures_util::future::join_all;
use shared_types::{Clause, ComplianceReport, ComplianceStats, EvaluationStatus};

use crate::classifier::{ClassifyError, ClauseClassifier};
use crate::risk::RiskExplainer;

/// Runs the verification pipeline for one document: classify every
/// clause, grade the failures, derive the stats.
pub struct ComplianceAgent {
    classifier: Arc<dyn ClauseClassifier>,
    risk_explainer: RiskExplainer,
}

impl ComplianceAgent {
    pub fn new(classifier: Arc<dyn ClauseClassifier>) -> Self {
        Self {
            classifier,
            risk_explainer: RiskExplainer::new(),
        }
    }

    /// Evaluate a clause list.
    ///
    /// Classification runs concurrently across clauses, and results are
    /// reassembled in input order, so verdict index i always belongs to
    /// clause index i. An empty clause list short-circuits without ever
    /// touching the classifier. A classifier failure on any clause
    /// yields a degraded report carrying the original clause count and
    /// the failure message; this method itself never fails.
    pub async fn evaluate(&self, clauses: &[Clause]) -> ComplianceReport {
        if clauses.is_empty() {
            return ComplianceReport {
                status: EvaluationStatus::Evaluated,
                error: None,
                verification_results: Vec::new(),
                risk_explanations: Vec::new(),
                compliance_stats: ComplianceStats::empty(),
            };
        }

        tracing::info!(clause_count = clauses.len(), "evaluating clauses");

        let outcomes = join_all(clauses.iter().map(|c| self.classifier.classify(c))).await;

        let mut verification_results = Vec::with_capacity(clauses.len());
        for (clause, outcome) in clauses.iter().zip(outcomes) {
            match outcome {
                Ok(verdict) => verification_results.push(verdict),
                Err(err) => {
                    tracing::error!(
                        clause_id = %clause.id,
                        error = %err,
                        "clause classification failed, degrading evaluation"
                    );
                    return Self::degraded(clauses.len(), &err);
                }
            }
        }

        let risk_explanations = self.risk_explainer.explain_all(&verification_results);
        let compliance_stats =
            ComplianceStats::from_lists(&verification_results, &risk_explanations);

        tracing::info!(
            compliant = compliance_stats.compliant_count,
            non_compliant = compliance_stats.non_compliant_count,
            rate = compliance_stats.compliance_rate,
            "clause evaluation complete"
        );

        ComplianceReport {
            status: EvaluationStatus::Evaluated,
            error: None,
            verification_results,
            risk_explanations,
            compliance_stats,
        }
    }

    fn degraded(clause_count: usize, err: &ClassifyError) -> ComplianceReport {
        ComplianceReport {
            status: EvaluationStatus::Degraded,
            error: Some(err.to_string()),
            verification_results: Vec::new(),
            risk_explanations: Vec::new(),
            compliance_stats: ComplianceStats::unevaluated(clause_count),
        }
    }
}
