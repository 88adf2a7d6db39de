//! Serialized shapes of the dashboard views. Field names are camelCase
//! because these go straight to the dashboard client.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::ProcessingStatus;

/// Top-of-dashboard summary numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub total_documents: usize,
    pub processed_documents: usize,
    pub compliance_rate: f64,
    pub average_score: f64,
    pub high_risk_documents: usize,
    pub compliant_documents: usize,
    pub avg_processing_time_ms: u64,
    pub recent_uploads: Vec<RecentUpload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentUpload {
    pub document_id: String,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub status: ProcessingStatus,
}

/// One point of the 7-day compliance trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub score: f64,
}

/// Clause-level severity totals across the corpus, plus the count of
/// documents considered compliant outright (rate >= 90).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub compliant: usize,
}

/// A derived notification. Never stored; recomputed per request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'static str,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    pub priority: &'static str,
    pub document_id: String,
}

/// A derived lifecycle event for the processing timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'static str,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub document_id: String,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStats {
    pub average_time_ms: u64,
    pub success_rate: f64,
    pub total_processed: usize,
}

/// The analytics bundle backing the dashboard charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsData {
    pub compliance_trend: Vec<TrendPoint>,
    pub risk_distribution: RiskDistribution,
    pub processing_stats: ProcessingStats,
    pub compliance_areas: BTreeMap<&'static str, f64>,
}

/// Document-card risk grade used by the dashboard list view: any High
/// clause makes the document high risk, any Medium clause or a rate
/// under 80 makes it medium, otherwise low.
pub fn document_card_risk_level(
    high_risk_count: usize,
    medium_risk_count: usize,
    compliance_rate: f64,
) -> &'static str {
    if high_risk_count > 0 {
        "high"
    } else if medium_risk_count > 0 {
        "medium"
    } else if compliance_rate >= 80.0 {
        "low"
    } else {
        "medium"
    }
}
