//! Refresh timing state machine.
//!
//! The controller owns the 60-second auto-refresh cadence, which is
//! deliberately decoupled from the feed cache's own TTLs: a refresh cycle
//! forces a re-check every 60 seconds, but the cache may still serve a value
//! fetched within the last 15 minutes. A "refresh" is therefore a no-op from
//! the cache's perspective unless the cache TTL has also elapsed.
//!
//! A cached-but-expired value ("stale") is not tracked as a controller phase;
//! it is implicit in the cache TTL check.

use std::time::{Duration, Instant};

pub const AUTO_REFRESH_CADENCE: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    /// Cold start; nothing has been loaded yet.
    NoData,
    /// A fetch cycle is in flight (or has been requested).
    Refreshing,
    /// Data loaded; `last_loaded_at` records when.
    Fresh,
}

#[derive(Debug)]
pub struct RefreshController {
    phase: RefreshPhase,
    last_loaded_at: Option<Instant>,
    auto_refresh: bool,
}

impl RefreshController {
    pub fn new(auto_refresh: bool) -> Self {
        Self {
            phase: RefreshPhase::NoData,
            last_loaded_at: None,
            auto_refresh,
        }
    }

    pub fn phase(&self) -> RefreshPhase {
        self.phase
    }

    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    pub fn has_loaded(&self) -> bool {
        self.last_loaded_at.is_some()
    }

    /// True on cold start, on a pending (forced) refresh, and when the
    /// auto-refresh cadence has elapsed.
    pub fn needs_refresh(&self, now: Instant) -> bool {
        match self.phase {
            RefreshPhase::NoData | RefreshPhase::Refreshing => true,
            RefreshPhase::Fresh => self.auto_refresh && self.elapsed(now) >= AUTO_REFRESH_CADENCE,
        }
    }

    pub fn begin_refresh(&mut self) {
        self.phase = RefreshPhase::Refreshing;
    }

    pub fn complete_refresh(&mut self, now: Instant) {
        self.phase = RefreshPhase::Fresh;
        self.last_loaded_at = Some(now);
    }

    /// A failed cycle keeps the previous `last_loaded_at`; with no prior load
    /// the controller drops back to the cold-start phase.
    pub fn refresh_failed(&mut self) {
        self.phase = if self.has_loaded() {
            RefreshPhase::Fresh
        } else {
            RefreshPhase::NoData
        };
    }

    /// Manual "refresh now": bypasses the cadence, not the cache TTL.
    pub fn force_refresh(&mut self) {
        self.phase = RefreshPhase::Refreshing;
    }

    /// Seconds until the next auto-refresh, clamped at zero. Used for the
    /// countdown display.
    pub fn remaining_seconds(&self, now: Instant) -> u64 {
        AUTO_REFRESH_CADENCE
            .saturating_sub(self.elapsed(now))
            .as_secs()
    }

    /// The next cycle triggers when under one second remains.
    pub fn refresh_due(&self, now: Instant) -> bool {
        self.auto_refresh
            && AUTO_REFRESH_CADENCE.saturating_sub(self.elapsed(now)) < Duration::from_secs(1)
    }

    fn elapsed(&self, now: Instant) -> Duration {
        match self.last_loaded_at {
            Some(loaded_at) => now.duration_since(loaded_at),
            None => AUTO_REFRESH_CADENCE,
        }
    }
}
