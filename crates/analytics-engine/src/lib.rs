//! Corpus-level dashboard aggregation.
//!
//! Every view here is a pure function of the document metadata slice
//! handed in (plus an explicit reference date where a calendar window
//! is involved). Nothing is cached or persisted: dashboards poll, and
//! recomputing with unchanged input must yield identical output.

pub mod events;
pub mod overview;
pub mod trend;
pub mod views;

pub use events::{notifications, timeline};
pub use overview::{overview, risk_distribution};
pub use trend::{analytics, trend};
pub use views::{
    AnalyticsData, DashboardOverview, Notification, ProcessingStats, RecentUpload,
    RiskDistribution, TimelineEvent, TrendPoint,
};
