use crate::core::cache::TtlCache;
use crate::core::feed::{HistorySeries, Quote, RateFeed};
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Quotes stay fresh for 15 minutes, matching the feed's own delay.
pub const QUOTE_TTL: Duration = Duration::from_secs(15 * 60);
/// Daily history moves slowly; an hour per lookback window is plenty.
pub const HISTORY_TTL: Duration = Duration::from_secs(60 * 60);

/// TTL-memoizing decorator over any `RateFeed`, bounding the request rate
/// against the upstream API. Each distinct lookback window is its own cache
/// key. Feed errors propagate to the caller and are never cached, and an
/// expired entry is never served as a stale fallback.
pub struct CachingRateFeed<T: RateFeed> {
    inner: T,
    quote_cache: TtlCache<String, Quote>,
    history_cache: TtlCache<String, HistorySeries>,
    quote_ttl: Duration,
    history_ttl: Duration,
}

impl<T: RateFeed> CachingRateFeed<T> {
    pub fn new(inner: T) -> Self {
        Self::with_ttls(inner, QUOTE_TTL, HISTORY_TTL)
    }

    pub fn with_ttls(inner: T, quote_ttl: Duration, history_ttl: Duration) -> Self {
        Self {
            inner,
            quote_cache: TtlCache::new(),
            history_cache: TtlCache::new(),
            quote_ttl,
            history_ttl,
        }
    }
}

#[async_trait]
impl<T: RateFeed + Send + Sync> RateFeed for CachingRateFeed<T> {
    async fn latest(&self) -> Result<Quote> {
        let key = "latest".to_string();
        if let Some(cached) = self.quote_cache.get(&key, self.quote_ttl).await {
            return Ok(cached);
        }
        debug!("Quote cache miss, fetching from feed");
        let quote = self.inner.latest().await?;
        self.quote_cache.put(key, quote.clone()).await;
        Ok(quote)
    }

    async fn history(&self, days: u32) -> Result<HistorySeries> {
        let key = format!("history:{days}");
        if let Some(cached) = self.history_cache.get(&key, self.history_ttl).await {
            return Ok(cached);
        }
        debug!("History cache miss for {days}-day window, fetching from feed");
        let series = self.inner.history(days).await?;
        self.history_cache.put(key, series.clone()).await;
        Ok(series)
    }
}
