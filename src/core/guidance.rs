//! Buy/wait guidance heuristic.
//!
//! The score is a weighted indicator of how the current rate sits against the
//! three averages: +0.30 below the year average, +0.50 below the month
//! average, +0.20 below the week average. The mid-term trend deliberately
//! carries the heaviest weight. A recommendation is BUY only when the score
//! strictly exceeds 0.50; the 0.30 + 0.20 combination lands exactly on the
//! threshold and stays WAIT/SELL.

use std::fmt::Display;

pub const BUY_THRESHOLD: f64 = 0.50;

/// Weighted guidance score in [0.0, 1.0]. Pure function, recomputed on every
/// render.
pub fn score(current: f64, avg7: f64, avg30: f64, avg365: f64) -> f64 {
    let mut score = 0.0;
    if current < avg365 {
        score += 0.30;
    }
    if current < avg30 {
        score += 0.50;
    }
    if current < avg7 {
        score += 0.20;
    }
    score
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    Buy,
    WaitSell,
}

impl Recommendation {
    pub fn from_score(score: f64) -> Self {
        if score > BUY_THRESHOLD {
            Recommendation::Buy
        } else {
            Recommendation::WaitSell
        }
    }
}

impl Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Recommendation::Buy => "BUY",
                Recommendation::WaitSell => "WAIT / SELL",
            }
        )
    }
}
