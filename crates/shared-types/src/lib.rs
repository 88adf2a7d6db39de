//! Shared data model for the compliance analysis backend.
//!
//! Every entity that crosses a crate boundary lives here: document
//! metadata, extracted clauses, per-clause verdicts and risk
//! explanations, and the derived compliance statistics.

pub mod stats;
pub mod types;

pub use stats::ComplianceStats;
pub use types::{
    Clause, ComplianceReport, DocumentMetadata, EvaluationStatus, MatchedRule, ProcessingResults,
    ProcessingStatus, RiskExplanation, Severity, SummaryDraft, TimelinePeriod, VerificationResult,
};
