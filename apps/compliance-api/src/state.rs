//! Application state for the compliance API

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use compliance_engine::{ClauseClassifier, ComplianceAgent};
use document_store::{DocumentStore, SqliteStore};
use llm_client::{GeminiClient, Summarizer, DEFAULT_MODEL};
use shared_extract::{FileTextExtractor, TextExtractor};

/// Capability handles shared across requests. Constructed once at
/// startup and injected; no process-wide singletons.
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub extractor: Arc<dyn TextExtractor>,
    pub summarizer: Arc<dyn Summarizer>,
    pub agent: ComplianceAgent,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        extractor: Arc<dyn TextExtractor>,
        summarizer: Arc<dyn Summarizer>,
        classifier: Arc<dyn ClauseClassifier>,
    ) -> Self {
        Self {
            store,
            extractor,
            summarizer,
            agent: ComplianceAgent::new(classifier),
        }
    }

    /// Production wiring from environment configuration.
    pub async fn from_env() -> Result<Self> {
        let db_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
            let data_dir = dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("compliance-api");
            std::fs::create_dir_all(&data_dir).ok();
            format!("sqlite:{}/compliance.db?mode=rwc", data_dir.display())
        });
        let store = SqliteStore::connect(&db_url)
            .await
            .context("failed to open document store")?;

        let api_key =
            std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY must be set")?;
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let gemini = match std::env::var("GEMINI_BASE_URL") {
            Ok(base_url) => Arc::new(GeminiClient::new(&base_url, api_key, model, 300)),
            Err(_) => Arc::new(GeminiClient::with_defaults(api_key, model)),
        };
        tracing::info!(model = gemini.model(), "LLM client ready");

        Ok(Self::new(
            Arc::new(store),
            Arc::new(FileTextExtractor::new()),
            gemini.clone(),
            gemini,
        ))
    }
}

/// Get platform-specific data directory
mod dirs {
    use std::path::PathBuf;

    pub fn data_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(target_os = "windows")]
        {
            std::env::var("APPDATA").ok().map(PathBuf::from)
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }
}
