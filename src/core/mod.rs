//! Core business logic abstractions

pub mod averages;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod feed;
pub mod guidance;
pub mod log;
pub mod refresh;

// Re-export main types for cleaner imports
pub use averages::AverageSet;
pub use feed::{HistorySeries, Quote, RateFeed, RatePoint};
pub use guidance::Recommendation;
pub use refresh::RefreshController;
