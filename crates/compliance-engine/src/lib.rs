//! Clause-compliance verification and risk assessment.
//!
//! The [`ComplianceAgent`] takes the clause list extracted from one
//! document, obtains a verdict per clause from a pluggable
//! classification backend, grades flagged clauses through the keyword
//! risk corpus, and derives the document's compliance statistics. Its
//! one hard contract is positional completeness: for a clause list of
//! length N, callers get verdict and risk lists of length N (or a
//! labeled degraded report, never a panic).

pub mod agent;
pub mod classifier;
pub mod risk;

pub use agent::ComplianceAgent;
pub use classifier::{ClassifyError, ClauseClassifier};
pub use risk::{document_risk_level, document_risk_score, RiskExplainer};
