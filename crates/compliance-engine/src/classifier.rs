//! Classification capability consumed by the agent.

use async_trait::async_trait;
use shared_types::{Clause, VerificationResult};
use thiserror::Error;

/// Failure modes of the classification backend. All of them degrade
/// the evaluation instead of failing the request.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("classifier backend unavailable: {0}")]
    Unavailable(String),

    #[error("classifier request timed out after {0}s")]
    Timeout(u64),

    #[error("classifier quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("malformed classifier response: {0}")]
    MalformedResponse(String),
}

/// Produces a compliance verdict for a single clause.
///
/// Implementations must be safe to call concurrently; the agent fans
/// out one call per clause with no ordering between them.
#[async_trait]
pub trait ClauseClassifier: Send + Sync {
    async fn classify(&self, clause: &Clause) -> Result<VerificationResult, ClassifyError>;
}
