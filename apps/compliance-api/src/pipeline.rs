//! Upload processing pipeline.
//!
//! One call per upload: persist the `started` metadata record and the
//! raw file, extract text, summarize, normalize, evaluate compliance,
//! then persist results and the completed metadata. A failure anywhere
//! after the first write leaves the `started` record in place on
//! purpose: a crashed upload stays visible as a stalled entry instead
//! of vanishing.

use std::sync::Arc;

use chrono::Utc;
use document_store::StoreError;
use llm_client::LlmError;
use shared_extract::ExtractError;
use shared_types::{DocumentMetadata, ProcessingResults};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::state::AppState;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("storage failure: {0}")]
    Store(#[from] StoreError),

    #[error("text extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("summarization failed: {0}")]
    Summarization(#[from] LlmError),

    #[error("background task failed: {0}")]
    Task(String),
}

impl PipelineError {
    /// Stable error-kind label surfaced to API callers.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Store(_) => "StoreError",
            PipelineError::Extraction(_) => "ExtractError",
            PipelineError::Summarization(_) => "LlmError",
            PipelineError::Task(_) => "TaskError",
        }
    }
}

/// Mint a fresh document id: `doc_<12 hex>_<unix seconds>`. Every
/// upload gets its own id, so no two pipelines ever write the same
/// document.
fn mint_document_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("doc_{}_{}", &uuid[..12], Utc::now().timestamp())
}

/// Run the full pipeline for one uploaded file.
///
/// Degraded compliance evaluation is not a failure: the upload still
/// completes with the degraded report embedded. Only storage,
/// extraction, and summarization failures abort the request.
pub async fn process_upload(
    state: &AppState,
    bytes: Vec<u8>,
    filename: &str,
    content_type: &str,
    language: &str,
) -> Result<ProcessingResults, PipelineError> {
    let document_id = mint_document_id();
    let uploaded_at = Utc::now();
    let file_hash = hex::encode(Sha256::digest(&bytes));

    tracing::info!(
        document_id = %document_id,
        filename,
        size = bytes.len(),
        language,
        "upload received"
    );

    let mut metadata = DocumentMetadata::started(
        document_id.clone(),
        filename.to_string(),
        bytes.len() as u64,
        content_type.to_string(),
        language.to_string(),
        file_hash,
        uploaded_at,
    );
    state.store.put_metadata(&document_id, &metadata).await?;
    state.store.put_file(&document_id, &bytes, filename).await?;

    // Extraction is CPU-bound; keep it off the async runtime.
    let extractor = Arc::clone(&state.extractor);
    let (task_type, task_name) = (content_type.to_string(), filename.to_string());
    let text = tokio::task::spawn_blocking(move || extractor.extract(&bytes, &task_type, &task_name))
        .await
        .map_err(|e| PipelineError::Task(e.to_string()))??;

    tracing::info!(document_id = %document_id, chars = text.len(), "text extracted");

    let raw_summary = state.summarizer.summarize(&text, language).await?;
    let draft = json_repair::parse_draft(&raw_summary);
    if let Some(parse_error) = &draft.processing_error {
        tracing::warn!(
            document_id = %document_id,
            error = %parse_error,
            "summarizer response recovered via fallback draft"
        );
    }

    let report = state.agent.evaluate(&draft.clauses).await;

    let completed_at = Utc::now();
    let results = ProcessingResults {
        document_id: document_id.clone(),
        summary: draft.summary,
        clauses: draft.clauses,
        timelines: draft.timelines,
        compliance: report,
        processing_completed_at: completed_at,
    };
    state.store.put_results(&document_id, &results).await?;

    metadata.complete(&results.compliance.compliance_stats, completed_at);
    state.store.put_metadata(&document_id, &metadata).await?;

    tracing::info!(
        document_id = %document_id,
        clauses = results.compliance.compliance_stats.total_clauses,
        rate = results.compliance.compliance_stats.compliance_rate,
        "document fully processed"
    );

    Ok(results)
}
