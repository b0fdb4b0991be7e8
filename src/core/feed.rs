//! Exchange-rate feed abstractions and core types

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// A single point-in-time USD to PEN observation. Immutable once fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// PEN per USD, always positive.
    pub rate: f64,
    pub observed_at: DateTime<Utc>,
}

impl Quote {
    /// Timestamp formatted for display, e.g. "2026-08-30 14:05 UTC".
    pub fn observed_at_display(&self) -> String {
        self.observed_at.format("%Y-%m-%d %H:%M UTC").to_string()
    }
}

/// One daily close from the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct RatePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Chronological daily closes, one entry per trading day. Non-trading days
/// leave gaps; the series may be empty when the market was closed throughout
/// the requested window.
pub type HistorySeries = Vec<RatePoint>;

#[async_trait]
pub trait RateFeed: Send + Sync {
    /// Most recent intraday close, falling back to the most recent daily
    /// close. Fails if no data point exists at all.
    async fn latest(&self) -> Result<Quote>;

    /// Daily closes for the past `days` days. An empty series is not an
    /// error; it means the feed has no data for the window.
    async fn history(&self, days: u32) -> Result<HistorySeries>;
}
