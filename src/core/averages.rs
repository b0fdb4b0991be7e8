//! Rolling averages over the historical close series.

use crate::core::feed::HistorySeries;

/// Arithmetic mean of the last `window` entries by count, not calendar days.
/// Returns `None` when the series holds fewer than `window` points; the
/// caller substitutes a neutral fallback (see `AverageSet::from_series`).
pub fn rolling_mean(closes: &[f64], window: usize) -> Option<f64> {
    if window == 0 || closes.len() < window {
        return None;
    }
    let tail = &closes[closes.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}

/// The 7/30/365-day averages, all derived from the same 365-day series so
/// the shorter windows are subsets of the longer one rather than separately
/// sourced fetches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageSet {
    pub avg7: f64,
    pub avg30: f64,
    pub avg365: f64,
}

impl AverageSet {
    /// Computes the three averages from a year of daily closes. Windows the
    /// series cannot fill fall back to `fallback` (the current rate), which
    /// keeps short histories from distorting the guidance score.
    ///
    /// The year average is the mean of the whole fetched series: a 365-day
    /// lookback yields only trading days, so counting back 365 points would
    /// never be satisfiable.
    pub fn from_series(series: &HistorySeries, fallback: f64) -> Self {
        let closes: Vec<f64> = series.iter().map(|p| p.close).collect();
        let avg365 = if closes.is_empty() {
            fallback
        } else {
            closes.iter().sum::<f64>() / closes.len() as f64
        };
        Self {
            avg7: rolling_mean(&closes, 7).unwrap_or(fallback),
            avg30: rolling_mean(&closes, 30).unwrap_or(fallback),
            avg365,
        }
    }
}
