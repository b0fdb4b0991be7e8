//! Assembles the per-render view model from the rate feed.

use crate::core::averages::AverageSet;
use crate::core::feed::{HistorySeries, Quote, RateFeed};
use crate::core::guidance::{self, Recommendation};
use anyhow::Result;
use tracing::debug;

/// The averages are always derived from a full year of closes, regardless of
/// the chart window, so the 7- and 30-day means are subsets of the same
/// series.
pub const AVERAGES_LOOKBACK_DAYS: u32 = 365;

/// Chart portion of the dashboard. `error` is set when the history fetch
/// failed; an empty `series` with no error means the feed had no data for
/// the window. Either way the rest of the dashboard still renders.
#[derive(Debug, Clone)]
pub struct ChartSection {
    pub window_days: u32,
    pub series: HistorySeries,
    pub error: Option<String>,
}

impl ChartSection {
    pub fn has_data(&self) -> bool {
        self.error.is_none() && !self.series.is_empty()
    }
}

/// Everything the presentation layer needs for one render cycle. Values are
/// recomputed from scratch each cycle; nothing here accumulates state.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub quote: Quote,
    pub usd_amount: f64,
    pub converted: f64,
    pub averages: AverageSet,
    pub score: f64,
    pub recommendation: Recommendation,
    pub chart: ChartSection,
}

/// Runs one render cycle's worth of fetches and computation.
///
/// A failed latest-quote fetch is fatal to the cycle and propagates. History
/// failures are isolated to the sections they feed: the chart carries the
/// error message and the averages fall back to the current rate.
pub async fn build(
    feed: &(dyn RateFeed),
    usd_amount: f64,
    window_days: u32,
) -> Result<DashboardData> {
    let (quote_result, year_result) =
        futures::join!(feed.latest(), feed.history(AVERAGES_LOOKBACK_DAYS));

    let quote = quote_result?;
    debug!(rate = quote.rate, "Fetched latest quote");

    let (averages, year_error) = match &year_result {
        Ok(series) => (AverageSet::from_series(series, quote.rate), None),
        Err(e) => {
            debug!("History fetch failed, averages fall back to current rate: {e}");
            (
                AverageSet::from_series(&Vec::new(), quote.rate),
                Some(e.to_string()),
            )
        }
    };

    let chart = if window_days == AVERAGES_LOOKBACK_DAYS {
        // Same lookback: reuse the year series instead of fetching twice
        ChartSection {
            window_days,
            series: year_result.unwrap_or_default(),
            error: year_error,
        }
    } else {
        match feed.history(window_days).await {
            Ok(series) => ChartSection {
                window_days,
                series,
                error: None,
            },
            Err(e) => ChartSection {
                window_days,
                series: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    };

    let score = guidance::score(quote.rate, averages.avg7, averages.avg30, averages.avg365);
    let recommendation = Recommendation::from_score(score);
    let converted = usd_amount * quote.rate;

    Ok(DashboardData {
        quote,
        usd_amount,
        converted,
        averages,
        score,
        recommendation,
        chart,
    })
}
