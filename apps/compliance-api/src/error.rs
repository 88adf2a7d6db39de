//! Error types for the compliance API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use document_store::StoreError;
use serde_json::json;
use thiserror::Error;

use crate::pipeline::PipelineError;

/// File details attached to upload failures so the caller can tell
/// which upload broke even when the id never reached them.
#[derive(Debug, Clone)]
pub struct UploadContext {
    pub filename: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("document not found: {0}")]
    DocumentNotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("processing error: {source}")]
    Processing {
        source: PipelineError,
        file: UploadContext,
    },

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::DocumentNotFound(id) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("Document {} not found", id) }),
            ),
            ApiError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            ApiError::Processing { source, file } => {
                tracing::error!(error = %source, filename = %file.filename, "upload processing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Processing error",
                        "type": source.kind(),
                        "message": source.to_string(),
                        "file_info": {
                            "filename": file.filename,
                            "content_type": file.content_type,
                            "size": file.size,
                        },
                    }),
                )
            }
            ApiError::Store(e) => {
                tracing::error!("store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Storage error" }),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!("internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal error" }),
                )
            }
        };

        let mut body = body;
        if let Some(obj) = body.as_object_mut() {
            obj.insert("status".into(), json!(status.as_u16()));
        }

        (status, Json(body)).into_response()
    }
}
