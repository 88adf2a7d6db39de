//! HTTP client for the LLM capabilities: document summarization and
//! per-clause compliance classification.
//!
//! Both capabilities are backed by the Gemini `generateContent` REST
//! API through one [`GeminiClient`]. The summarizer returns the
//! model's raw text; repairing and parsing it is the caller's job.
//! Classification parses the verdict here, repairing the response
//! first, because its output feeds straight into the evaluation
//! pipeline.

pub mod prompts;

use async_trait::async_trait;
use compliance_engine::{ClassifyError, ClauseClassifier};
use serde::{Deserialize, Serialize};
use shared_types::{Clause, VerificationResult};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("cannot reach LLM endpoint at {0}")]
    Connection(String),

    #[error("LLM request timed out after {0}s")]
    Timeout(u64),

    #[error("LLM API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse LLM response: {0}")]
    ResponseParsing(String),

    #[error("LLM returned an empty completion")]
    EmptyCompletion,
}

/// Produces the raw structured-summary text for a document.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, language: &str) -> Result<String, LlmError>;
}

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Low temperature keeps the structured outputs stable across retries.
const TEMPERATURE: f64 = 0.1;

/// Gemini HTTP client.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: String, model: String, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            client,
            timeout_secs,
        }
    }

    /// Default public endpoint with a 5-minute timeout.
    pub fn with_defaults(api_key: String, model: String) -> Self {
        Self::new(DEFAULT_BASE_URL, api_key, model, 300)
    }

    /// The model name being used.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// One `generateContent` call, returning the first candidate's
    /// text.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
            },
        };

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_connect() {
                LlmError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                LlmError::Timeout(self.timeout_secs)
            } else {
                LlmError::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LlmError::EmptyCompletion);
        }
        Ok(text.trim().to_string())
    }
}

/// Request body for `models/{model}:generateContent`
#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
}

/// Response body from `models/{model}:generateContent`
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(&self, text: &str, language: &str) -> Result<String, LlmError> {
        tracing::info!(model = %self.model, language, chars = text.len(), "requesting summary");
        self.generate(&prompts::summarization_prompt(text, language))
            .await
    }
}

#[async_trait]
impl ClauseClassifier for GeminiClient {
    async fn classify(&self, clause: &Clause) -> Result<VerificationResult, ClassifyError> {
        let raw = self
            .generate(&prompts::verification_prompt(clause))
            .await
            .map_err(|e| match e {
                LlmError::Timeout(secs) => ClassifyError::Timeout(secs),
                LlmError::Api { status: 429, body } => ClassifyError::QuotaExhausted(body),
                err @ (LlmError::EmptyCompletion | LlmError::ResponseParsing(_)) => {
                    ClassifyError::MalformedResponse(err.to_string())
                }
                other => ClassifyError::Unavailable(other.to_string()),
            })?;

        // Verdicts come back with the same fencing and trailing-comma
        // habits as summaries.
        let cleaned = json_repair::repair(&raw);
        serde_json::from_str(&cleaned)
            .map_err(|e| ClassifyError::MalformedResponse(format!("{e}: {cleaned}")))
    }
}
