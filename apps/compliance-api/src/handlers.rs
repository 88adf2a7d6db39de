//! HTTP handlers for the compliance API

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::Utc;
use compliance_engine::risk::{document_risk_level, document_risk_score};
use shared_types::{DocumentMetadata, ProcessingResults};
use std::sync::Arc;

use crate::error::{ApiError, UploadContext};
use crate::models::*;
use crate::pipeline;
use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_LANGUAGE: &str = "English";

/// Root endpoint with API information
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Compliance analysis API is running",
        status: "healthy",
        version: VERSION,
        endpoints: vec![
            EndpointInfo {
                path: "/",
                method: "GET",
                description: "API information",
            },
            EndpointInfo {
                path: "/health",
                method: "GET",
                description: "Health check",
            },
            EndpointInfo {
                path: "/upload",
                method: "POST",
                description: "Upload a document for analysis",
            },
        ],
    })
}

/// Health check endpoint: probes document store connectivity.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    match state.store.healthcheck().await {
        Ok(()) => Json(HealthResponse {
            status: "healthy",
            message: "Compliance backend is operational".to_string(),
            timestamp: Utc::now(),
            version: VERSION,
        }),
        Err(e) => Json(HealthResponse {
            status: "unhealthy",
            message: format!("Document store error: {e}"),
            timestamp: Utc::now(),
            version: VERSION,
        }),
    }
}

/// Upload a document and run the full analysis pipeline.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ProcessingResults>, ApiError> {
    let mut file: Option<(Vec<u8>, String, String)> = None;
    let mut language: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("file") => {
                let filename = field
                    .file_name()
                    .unwrap_or("upload.pdf")
                    .to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::InvalidRequest(format!("Failed to read file: {e}")))?;
                file = Some((bytes.to_vec(), filename, content_type));
            }
            Some("language") | Some("lang") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::InvalidRequest(format!("Failed to read field: {e}")))?;
                if !value.trim().is_empty() {
                    language = Some(value);
                }
            }
            _ => {}
        }
    }

    let (bytes, filename, content_type) =
        file.ok_or_else(|| ApiError::InvalidRequest("Missing 'file' field".to_string()))?;
    let language = language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    let context = UploadContext {
        filename: filename.clone(),
        content_type: content_type.clone(),
        size: bytes.len(),
    };

    pipeline::process_upload(&state, bytes, &filename, &content_type, &language)
        .await
        .map(Json)
        .map_err(|source| ApiError::Processing {
            source,
            file: context,
        })
}

/// Load metadata for the most recent documents, newest first.
async fn load_corpus(state: &AppState, limit: u32) -> Result<Vec<DocumentMetadata>, ApiError> {
    let ids = state.store.list_ids(limit).await?;
    let mut docs = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(metadata) = state.store.get_metadata(&id).await? {
            docs.push(metadata);
        }
    }
    Ok(docs)
}

/// Dashboard overview statistics
pub async fn dashboard_overview(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DataResponse<analytics_engine::DashboardOverview>>, ApiError> {
    let docs = load_corpus(&state, 10_000).await?;
    Ok(Json(DataResponse::success(analytics_engine::overview(
        &docs,
    ))))
}

/// Document list for the dashboard, newest first.
pub async fn dashboard_documents(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListResponse<DocumentInfo>>, ApiError> {
    let docs = load_corpus(&state, 100).await?;
    let mut cards: Vec<DocumentInfo> = docs.iter().map(DocumentInfo::from_metadata).collect();
    cards.sort_by(|a, b| {
        b.uploaded_at
            .cmp(&a.uploaded_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(Json(ListResponse::success(cards)))
}

/// Detailed analysis for one document. Not-found is distinct from an
/// empty result set: both records must exist.
pub async fn document_analysis(
    State(state): State<Arc<AppState>>,
    Path(document_id): Path<String>,
) -> Result<Json<DataResponse<AnalysisData>>, ApiError> {
    let metadata = state
        .store
        .get_metadata(&document_id)
        .await?
        .ok_or_else(|| ApiError::DocumentNotFound(document_id.clone()))?;
    let results = state
        .store
        .get_results(&document_id)
        .await?
        .ok_or_else(|| ApiError::DocumentNotFound(document_id.clone()))?;

    Ok(Json(DataResponse::success(AnalysisData::build(
        &metadata, &results,
    ))))
}

/// Derived notifications, newest first, capped at ten.
pub async fn dashboard_notifications(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NotificationsResponse>, ApiError> {
    let docs = load_corpus(&state, 20).await?;
    let notifications = analytics_engine::notifications(&docs);
    let unread_count = notifications.iter().filter(|n| !n.read).count();
    let total = notifications.len();
    Ok(Json(NotificationsResponse {
        status: "success",
        data: notifications,
        unread_count,
        total,
    }))
}

/// Processing timeline events, newest first, capped at ten.
pub async fn dashboard_timeline(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListResponse<analytics_engine::TimelineEvent>>, ApiError> {
    let docs = load_corpus(&state, 20).await?;
    Ok(Json(ListResponse::success(analytics_engine::timeline(
        &docs,
    ))))
}

/// Chart analytics: trend, risk distribution, processing stats.
pub async fn dashboard_analytics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DataResponse<analytics_engine::AnalyticsData>>, ApiError> {
    let docs = load_corpus(&state, 100).await?;
    let today = Utc::now().date_naive();
    Ok(Json(DataResponse::success(analytics_engine::analytics(
        &docs, today,
    ))))
}

/// Re-run compliance evaluation over a stored document's clauses.
pub async fn reanalyze_document(
    State(state): State<Arc<AppState>>,
    Path(document_id): Path<String>,
) -> Result<Json<DataResponse<ReanalysisReport>>, ApiError> {
    let metadata = state
        .store
        .get_metadata(&document_id)
        .await?
        .ok_or_else(|| ApiError::DocumentNotFound(document_id.clone()))?;
    let results = state
        .store
        .get_results(&document_id)
        .await?
        .ok_or_else(|| ApiError::DocumentNotFound(document_id.clone()))?;

    let report = state.agent.evaluate(&results.clauses).await;
    let stats = &report.compliance_stats;
    let risk_score = document_risk_score(stats);

    Ok(Json(DataResponse::success(ReanalysisReport {
        document_id: document_id.clone(),
        filename: metadata.filename.clone(),
        analysis_timestamp: Utc::now(),
        compliance_analysis: ComplianceAnalysis {
            total_clauses: stats.total_clauses,
            compliant_clauses: stats.compliant_count,
            non_compliant_clauses: stats.non_compliant_count,
            compliance_rate: stats.compliance_rate,
            high_risk_clauses: stats.high_risk_count,
            medium_risk_clauses: stats.medium_risk_count,
            low_risk_clauses: stats.low_risk_count,
        },
        risk_assessment: RiskAssessment {
            overall_risk_score: risk_score,
            risk_level: document_risk_level(risk_score),
            risk_factors: report.risk_explanations.clone(),
        },
        detailed_results: DetailedResults {
            verification_results: report.verification_results,
            risk_explanations: report.risk_explanations,
            extracted_clauses: results.clauses,
        },
        processing_status: "analyzed",
    })))
}

/// Delete a document's metadata, file, and results.
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(document_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    if !state.store.delete(&document_id).await? {
        return Err(ApiError::DocumentNotFound(document_id));
    }
    tracing::info!(document_id = %document_id, "document deleted");
    Ok(Json(DeleteResponse {
        success: true,
        message: format!("Document {document_id} deleted successfully"),
        document_id,
        timestamp: Utc::now(),
    }))
}

/// Delete every stored document. Per-document failures are logged and
/// skipped; the response reports how many actually went away.
pub async fn clear_all(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClearAllResponse>, ApiError> {
    let ids = state.store.list_ids(10_000).await?;
    let mut deleted_count = 0;
    for id in ids {
        match state.store.delete(&id).await {
            Ok(true) => deleted_count += 1,
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(document_id = %id, error = %e, "failed to delete document");
            }
        }
    }
    tracing::info!(deleted_count, "cleared stored documents");
    Ok(Json(ClearAllResponse {
        success: true,
        message: format!("Successfully cleared {deleted_count} documents"),
        deleted_count,
        timestamp: Utc::now(),
    }))
}
