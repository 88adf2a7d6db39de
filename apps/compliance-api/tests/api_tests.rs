//! In-process API tests with mock LLM capabilities and an in-memory
//! document store.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use tower::ServiceExt;

use compliance_api::{router, state::AppState};
use compliance_engine::{ClassifyError, ClauseClassifier};
use document_store::SqliteStore;
use llm_client::{LlmError, Summarizer};
use shared_extract::FileTextExtractor;
use shared_types::{Clause, MatchedRule, VerificationResult};

/// Summarizer returning a canned response, fenced and with trailing
/// commas the way real model output arrives.
struct CannedSummarizer {
    response: String,
}

#[async_trait]
impl Summarizer for CannedSummarizer {
    async fn summarize(&self, _text: &str, _language: &str) -> Result<String, LlmError> {
        Ok(self.response.clone())
    }
}

/// Deterministic classifier: clauses mentioning "undisclosed" fail
/// against a fraud-flavored rule, everything else passes.
struct KeywordClassifier;

#[async_trait]
impl ClauseClassifier for KeywordClassifier {
    async fn classify(&self, clause: &Clause) -> Result<VerificationResult, ClassifyError> {
        let is_compliant = !clause.text_en.contains("undisclosed");
        Ok(VerificationResult {
            is_compliant,
            final_reason: if is_compliant {
                "clause satisfies disclosure requirements".into()
            } else {
                "clause conceals material information".into()
            },
            matched_rules: if is_compliant {
                Vec::new()
            } else {
                vec![MatchedRule {
                    rule: "disclosure obligations prohibit fraud".into(),
                    is_relevant: true,
                    reason: "fees are withheld from clients".into(),
                }]
            },
            section: None,
        })
    }
}

struct FailingClassifier;

#[async_trait]
impl ClauseClassifier for FailingClassifier {
    async fn classify(&self, _clause: &Clause) -> Result<VerificationResult, ClassifyError> {
        Err(ClassifyError::Unavailable("backend quota exceeded".into()))
    }
}

/// The summarizer response used by most tests: three clauses, one of
/// which the mock classifier will flag as high-risk.
fn three_clause_response() -> String {
    r#"```json
{
    "summary": "An investment agreement with fee and reporting clauses.",
    "Timelines": {
        "timeline1": {"start": "2024-01-01", "end": null, "description": "Agreement effective"},
    },
    "Clauses": [
        {"clause_id": "C-1", "text_en": "All management fees are disclosed annually."},
        {"clause_id": "C-2", "text_en": "Certain charges remain undisclosed to retail clients."},
        {"clause_id": "C-3", "text_en": "Quarterly reports are filed with the regulator."},
    ],
}
```"#
        .to_string()
}

async fn test_app(summarizer: Arc<dyn Summarizer>, classifier: Arc<dyn ClauseClassifier>) -> Router {
    let store = SqliteStore::in_memory().await.unwrap();
    let state = AppState::new(
        Arc::new(store),
        Arc::new(FileTextExtractor::new()),
        summarizer,
        classifier,
    );
    router(Arc::new(state))
}

async fn default_app() -> Router {
    test_app(
        Arc::new(CannedSummarizer {
            response: three_clause_response(),
        }),
        Arc::new(KeywordClassifier),
    )
    .await
}

fn multipart_upload(path: &str) -> Request<Body> {
    let boundary = "test-boundary-7MA4YWxkTrZu0gW";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"prospectus.txt\"\r\n\
         Content-Type: text/plain\r\n\r\n\
         Section 1. Fees. Section 2. Reporting obligations.\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"language\"\r\n\r\n\
         English\r\n\
         --{boundary}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri(path)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn upload_returns_full_processing_results() {
    let app = default_app().await;
    let response = app.oneshot(multipart_upload("/upload")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert!(json["document_id"].as_str().unwrap().starts_with("doc_"));
    assert_eq!(
        json["summary"],
        "An investment agreement with fee and reporting clauses."
    );
    assert_eq!(json["clauses"].as_array().unwrap().len(), 3);
    assert_eq!(json["timelines"]["timeline1"]["start"], "2024-01-01");

    let stats = &json["compliance_results"]["compliance_stats"];
    assert_eq!(stats["total_clauses"], 3);
    assert_eq!(stats["compliant_count"], 2);
    assert_eq!(stats["non_compliant_count"], 1);
    assert_eq!(stats["high_risk_count"], 1);
    assert_eq!(stats["compliance_rate"], 66.67);

    // Positional alignment of verdicts and risk slots.
    let verdicts = json["compliance_results"]["verification_results"]
        .as_array()
        .unwrap();
    let risks = json["compliance_results"]["risk_explanations"]
        .as_array()
        .unwrap();
    assert_eq!(verdicts.len(), 3);
    assert_eq!(risks.len(), 3);
    assert!(risks[0].is_null());
    assert_eq!(risks[1]["severity"], "High");
    assert!(risks[2].is_null());
}

#[tokio::test]
async fn upload_then_analysis_round_trip() {
    let app = default_app().await;
    let upload = body_json(app.clone().oneshot(multipart_upload("/upload")).await.unwrap()).await;
    let id = upload["document_id"].as_str().unwrap();

    let response = app
        .oneshot(get(&format!("/api/dashboard/analysis/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = &json["data"];

    assert_eq!(json["status"], "success");
    assert_eq!(data["fileName"], "prospectus.txt");
    assert_eq!(data["totalClauses"], 3);
    assert_eq!(data["riskLevel"], "high");
    assert_eq!(data["status"], "completed");

    let clauses = data["clauses"].as_array().unwrap();
    assert_eq!(clauses.len(), 3);
    assert_eq!(clauses[0]["id"], "clause_1");
    assert_eq!(clauses[0]["isCompliant"], true);
    assert_eq!(clauses[1]["isCompliant"], false);
    assert_eq!(clauses[1]["riskLevel"], "high");
    assert_eq!(clauses[1]["category"], "Legal");
    assert_eq!(clauses[2]["riskLevel"], "unknown");
}

#[tokio::test]
async fn overview_is_stable_between_reads() {
    let app = default_app().await;
    app.clone().oneshot(multipart_upload("/upload")).await.unwrap();

    let first = body_json(
        app.clone()
            .oneshot(get("/api/dashboard/overview"))
            .await
            .unwrap(),
    )
    .await;
    let second = body_json(app.oneshot(get("/api/dashboard/overview")).await.unwrap()).await;

    assert_eq!(first, second);
    assert_eq!(first["data"]["totalDocuments"], 1);
    assert_eq!(first["data"]["processedDocuments"], 1);
    assert_eq!(first["data"]["highRiskDocuments"], 1);
    assert_eq!(first["data"]["complianceRate"], 66.7);
}

#[tokio::test]
async fn document_list_shows_uploaded_documents() {
    let app = default_app().await;
    app.clone().oneshot(multipart_upload("/upload")).await.unwrap();

    let json = body_json(
        app.oneshot(get("/api/dashboard/documents"))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(json["total"], 1);
    let card = &json["data"][0];
    assert_eq!(card["fileName"], "prospectus.txt");
    assert_eq!(card["status"], "completed");
    assert_eq!(card["riskLevel"], "high");
    assert_eq!(card["complianceRate"], 66.67);
}

#[tokio::test]
async fn notifications_cover_risk_completion_and_low_score() {
    let app = default_app().await;
    app.clone().oneshot(multipart_upload("/upload")).await.unwrap();

    let json = body_json(
        app.oneshot(get("/api/dashboard/notifications"))
            .await
            .unwrap(),
    )
    .await;

    let kinds: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["type"].as_str().unwrap())
        .collect();
    // 66.67% compliance: high-risk, completed, and low-compliance notices.
    assert!(kinds.contains(&"warning"));
    assert!(kinds.contains(&"success"));
    assert!(kinds.contains(&"error"));
    assert_eq!(json["unreadCount"], json["total"]);
}

#[tokio::test]
async fn timeline_lists_upload_and_completion() {
    let app = default_app().await;
    app.clone().oneshot(multipart_upload("/upload")).await.unwrap();

    let json = body_json(app.oneshot(get("/api/dashboard/timeline")).await.unwrap()).await;
    let kinds: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap())
        .collect();
    assert!(kinds.contains(&"upload"));
    assert!(kinds.contains(&"completed"));
}

#[tokio::test]
async fn analytics_returns_seven_day_trend() {
    let app = default_app().await;
    app.clone().oneshot(multipart_upload("/upload")).await.unwrap();

    let json = body_json(app.oneshot(get("/api/dashboard/analytics")).await.unwrap()).await;
    let trend = json["data"]["complianceTrend"].as_array().unwrap();
    assert_eq!(trend.len(), 7);
    // Today's point reflects the single uploaded document.
    assert_eq!(trend[6]["score"], 66.7);
    assert_eq!(json["data"]["riskDistribution"]["high"], 1);
}

#[tokio::test]
async fn reanalysis_matches_stored_stats_with_deterministic_classifier() {
    let app = default_app().await;
    let upload = body_json(app.clone().oneshot(multipart_upload("/upload")).await.unwrap()).await;
    let id = upload["document_id"].as_str().unwrap();

    let json = body_json(
        app.oneshot(get(&format!("/api/dashboard/analyze/{id}")))
            .await
            .unwrap(),
    )
    .await;
    let analysis = &json["data"]["complianceAnalysis"];

    assert_eq!(analysis["totalClauses"], 3);
    assert_eq!(analysis["complianceRate"], 66.67);
    assert_eq!(analysis["highRiskClauses"], 1);
    // 1 high clause out of 3: (3*1)/(3*3) = 33.33, low document risk.
    assert_eq!(json["data"]["riskAssessment"]["overallRiskScore"], 33.33);
    assert_eq!(json["data"]["riskAssessment"]["riskLevel"], "Low");
}

#[tokio::test]
async fn delete_removes_the_document_everywhere() {
    let app = default_app().await;
    let upload = body_json(app.clone().oneshot(multipart_upload("/upload")).await.unwrap()).await;
    let id = upload["document_id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/dashboard/documents/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let analysis = app
        .clone()
        .oneshot(get(&format!("/api/dashboard/analysis/{id}")))
        .await
        .unwrap();
    assert_eq!(analysis.status(), StatusCode::NOT_FOUND);

    let documents = body_json(
        app.oneshot(get("/api/dashboard/documents"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(documents["total"], 0);
}

#[tokio::test]
async fn missing_document_is_a_404() {
    let app = default_app().await;
    let response = app
        .oneshot(get("/api/dashboard/analysis/doc_does_not_exist"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_without_file_is_a_400() {
    let app = default_app().await;
    let boundary = "test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"language\"\r\n\r\n\
         English\r\n\
         --{boundary}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn classifier_outage_degrades_instead_of_failing() {
    let app = test_app(
        Arc::new(CannedSummarizer {
            response: three_clause_response(),
        }),
        Arc::new(FailingClassifier),
    )
    .await;

    let response = app.clone().oneshot(multipart_upload("/upload")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let compliance = &json["compliance_results"];
    assert_eq!(compliance["status"], "degraded");
    assert!(compliance["error"]
        .as_str()
        .unwrap()
        .contains("quota exceeded"));
    assert_eq!(compliance["compliance_stats"]["total_clauses"], 3);
    assert_eq!(compliance["compliance_stats"]["compliant_count"], 0);
    assert_eq!(compliance["compliance_stats"]["compliance_rate"], 0.0);

    // The document still completes and shows up on the dashboard.
    let overview = body_json(app.oneshot(get("/api/dashboard/overview")).await.unwrap()).await;
    assert_eq!(overview["data"]["processedDocuments"], 1);
}

#[tokio::test]
async fn unparseable_summary_falls_back_to_empty_draft() {
    let app = test_app(
        Arc::new(CannedSummarizer {
            response: "the model rambled instead of returning JSON {".to_string(),
        }),
        Arc::new(KeywordClassifier),
    )
    .await;

    let response = app.oneshot(multipart_upload("/upload")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["summary"], json_repair::FALLBACK_SUMMARY);
    assert_eq!(json["clauses"].as_array().unwrap().len(), 0);
    assert_eq!(
        json["compliance_results"]["compliance_stats"]["total_clauses"],
        0
    );
    assert_eq!(
        json["compliance_results"]["compliance_stats"]["compliance_rate"],
        0.0
    );
}

#[tokio::test]
async fn health_reports_store_connectivity() {
    let app = default_app().await;
    let json = body_json(app.oneshot(get("/health")).await.unwrap()).await;
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn root_lists_endpoints() {
    let app = default_app().await;
    let json = body_json(app.oneshot(get("/")).await.unwrap()).await;
    assert_eq!(json["status"], "healthy");
    assert!(!json["endpoints"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn clear_all_empties_the_store() {
    let app = default_app().await;
    app.clone().oneshot(multipart_upload("/upload")).await.unwrap();
    app.clone().oneshot(multipart_upload("/upload")).await.unwrap();

    let json = body_json(
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/dashboard/clear-all")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(json["deletedCount"], 2);

    let documents = body_json(
        app.oneshot(get("/api/dashboard/documents"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(documents["total"], 0);
}
