//! Compliance trend and chart analytics.

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate};
use shared_types::stats::round1;
use shared_types::{DocumentMetadata, ProcessingStatus};

use crate::overview::risk_distribution;
use crate::views::{AnalyticsData, ProcessingStats, TrendPoint};

/// Score used for trend days with no data and no earlier day to carry
/// forward from.
const TREND_BASELINE: f64 = 85.0;

/// Synthesized processing time used by the analytics charts.
fn estimated_processing_ms(doc: &DocumentMetadata) -> u64 {
    2000 + doc.high_risk_count as u64 * 300 + doc.medium_risk_count as u64 * 150
}

/// Compliance trend over the seven calendar days ending at `today`.
///
/// Days with at least one completed document average that day's rates.
/// Empty days carry the previous day's value forward; the earliest gap
/// falls back to the fixed baseline. This is an explicit interpolation
/// policy: the chart never has holes.
pub fn trend(docs: &[DocumentMetadata], today: NaiveDate) -> Vec<TrendPoint> {
    let mut by_date: HashMap<NaiveDate, Vec<f64>> = HashMap::new();
    for doc in docs {
        if doc.processing_status != ProcessingStatus::Completed {
            continue;
        }
        let date = doc.activity_at().date_naive();
        by_date.entry(date).or_default().push(doc.compliance_rate);
    }

    let mut points = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let score = match by_date.get(&date) {
            Some(rates) => round1(rates.iter().sum::<f64>() / rates.len() as f64),
            None => points
                .last()
                .map(|p: &TrendPoint| p.score)
                .unwrap_or(TREND_BASELINE),
        };
        points.push(TrendPoint {
            date: date.format("%Y-%m-%d").to_string(),
            score,
        });
    }
    points
}

/// The analytics bundle for the dashboard charts: trend, risk
/// distribution, processing stats, and per-area scores derived from
/// the mean compliance rate.
pub fn analytics(docs: &[DocumentMetadata], today: NaiveDate) -> AnalyticsData {
    let mut completed = 0usize;
    let mut in_flight = 0usize;
    let mut processing_times: Vec<u64> = Vec::new();
    let mut rates: Vec<f64> = Vec::new();

    for doc in docs {
        match doc.processing_status {
            ProcessingStatus::Completed => {
                completed += 1;
                processing_times.push(estimated_processing_ms(doc));
                rates.push(doc.compliance_rate);
            }
            ProcessingStatus::Started | ProcessingStatus::Processing => in_flight += 1,
            ProcessingStatus::Failed => {}
        }
    }

    let total_processed = completed + in_flight;
    let success_rate = if total_processed > 0 {
        round1(completed as f64 / total_processed as f64 * 100.0)
    } else {
        0.0
    };
    let average_time_ms = if processing_times.is_empty() {
        2450
    } else {
        processing_times.iter().sum::<u64>() / processing_times.len() as u64
    };

    let mean_rate = (!rates.is_empty()).then(|| rates.iter().sum::<f64>() / rates.len() as f64);
    let area = |offset: f64, default: f64| match mean_rate {
        Some(mean) => round1((mean + offset).clamp(0.0, 100.0)),
        None => default,
    };
    let compliance_areas: BTreeMap<&'static str, f64> = [
        ("Legal Compliance", area(0.0, 85.0)),
        ("Financial Terms", area(-5.0, 80.0)),
        ("Risk Disclosure", area(3.0, 88.0)),
        ("Regulatory Requirements", area(6.0, 91.0)),
    ]
    .into_iter()
    .collect();

    AnalyticsData {
        compliance_trend: trend(docs, today),
        risk_distribution: risk_distribution(docs),
        processing_stats: ProcessingStats {
            average_time_ms,
            success_rate,
            total_processed,
        },
        compliance_areas,
    }
}
