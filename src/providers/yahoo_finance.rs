use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::feed::{HistorySeries, Quote, RateFeed, RatePoint};

/// Yahoo symbol for the USD to PEN pair.
pub const SYMBOL: &str = "PEN=X";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Rate feed backed by the Yahoo Finance v8 chart API. Quotes carry the
/// feed's usual 15-minute delay.
pub struct YahooRateFeed {
    base_url: String,
}

impl YahooRateFeed {
    pub fn new(base_url: &str) -> Self {
        YahooRateFeed {
            base_url: base_url.to_string(),
        }
    }

    async fn fetch_chart(&self, query: &str) -> Result<ChartItem> {
        let url = format!("{}/v8/finance/chart/{}?{}", self.base_url, SYMBOL, query);
        debug!("Requesting rate data from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("penwatch/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                SYMBOL
            ));
        }

        let text = response.text().await?;
        let data: YahooChartResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", SYMBOL, e))?;

        data.chart
            .result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No chart data found for symbol: {}", SYMBOL))
    }
}

#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    result: Vec<ChartItem>,
}

#[derive(Deserialize, Debug)]
struct ChartItem {
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<QuoteIndicator>,
}

#[derive(Deserialize, Debug)]
struct QuoteIndicator {
    close: Option<Vec<Option<f64>>>,
}

fn closes_of(item: &ChartItem) -> Vec<Option<f64>> {
    item.indicators
        .as_ref()
        .and_then(|inds| inds.quote.first())
        .and_then(|q| q.close.clone())
        .unwrap_or_default()
}

fn last_close(item: &ChartItem) -> Option<f64> {
    closes_of(item).into_iter().flatten().last()
}

#[async_trait]
impl RateFeed for YahooRateFeed {
    #[instrument(name = "YahooLatestQuote", skip(self))]
    async fn latest(&self) -> Result<Quote> {
        // Intraday first; the daily interval is the fallback when the feed
        // has no minute bars for the session
        let intraday_close = match self.fetch_chart("interval=1m&range=1d").await {
            Ok(item) => last_close(&item),
            Err(e) => {
                debug!("Intraday quote fetch failed: {e}");
                None
            }
        };

        let rate = match intraday_close {
            Some(close) => close,
            None => {
                debug!("No intraday closes, falling back to daily interval");
                let daily = self.fetch_chart("interval=1d&range=1d").await?;
                last_close(&daily)
                    .ok_or_else(|| anyhow!("No quote data available for {}", SYMBOL))?
            }
        };

        Ok(Quote {
            rate,
            observed_at: Utc::now(),
        })
    }

    #[instrument(name = "YahooHistoryFetch", skip(self), fields(days = days))]
    async fn history(&self, days: u32) -> Result<HistorySeries> {
        // [start, end) at day granularity, matching the feed's own exclusive
        // end-date convention
        let end = Utc::now().date_naive();
        let start = end - ChronoDuration::days(days as i64);
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = end.and_time(NaiveTime::MIN).and_utc().timestamp();

        let item = self
            .fetch_chart(&format!(
                "interval=1d&period1={period1}&period2={period2}"
            ))
            .await?;

        let timestamps = item.timestamp.clone().unwrap_or_default();
        let series: HistorySeries = timestamps
            .iter()
            .zip(closes_of(&item))
            .filter_map(|(ts, close)| {
                let close = close?;
                let date = Utc.timestamp_opt(*ts, 0).single()?.date_naive();
                Some(RatePoint { date, close })
            })
            .collect();

        debug!("Fetched {} daily closes for {days}-day window", series.len());
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CHART_PATH: &str = "/v8/finance/chart/PEN=X";

    async fn mount_chart_mock(server: &MockServer, interval: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(CHART_PATH))
            .and(query_param("interval", interval))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    fn chart_body(timestamps: &[i64], closes: &[Option<f64>]) -> String {
        let closes_json: Vec<String> = closes
            .iter()
            .map(|c| c.map_or("null".to_string(), |v| v.to_string()))
            .collect();
        format!(
            r#"{{
                "chart": {{
                    "result": [{{
                        "timestamp": [{}],
                        "indicators": {{
                            "quote": [{{
                                "close": [{}]
                            }}]
                        }}
                    }}]
                }}
            }}"#,
            timestamps
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            closes_json.join(", ")
        )
    }

    #[tokio::test]
    async fn test_latest_uses_last_intraday_close() {
        let server = MockServer::start().await;
        let body = chart_body(&[1_735_689_600, 1_735_689_660, 1_735_689_720], &[
            Some(3.71),
            Some(3.72),
            None,
        ]);
        mount_chart_mock(&server, "1m", &body).await;

        let feed = YahooRateFeed::new(&server.uri());
        let quote = feed.latest().await.unwrap();
        // Trailing null is skipped; the last real close wins
        assert_eq!(quote.rate, 3.72);
        assert!(quote.rate > 0.0);
    }

    #[tokio::test]
    async fn test_latest_falls_back_to_daily_close() {
        let server = MockServer::start().await;
        // Intraday response carries no bars at all
        let empty = r#"{"chart": {"result": [{}]}}"#;
        mount_chart_mock(&server, "1m", empty).await;
        let daily = chart_body(&[1_735_689_600], &[Some(3.745)]);
        mount_chart_mock(&server, "1d", &daily).await;

        let feed = YahooRateFeed::new(&server.uri());
        let quote = feed.latest().await.unwrap();
        assert_eq!(quote.rate, 3.745);
    }

    #[tokio::test]
    async fn test_latest_fails_with_no_data_anywhere() {
        let server = MockServer::start().await;
        let empty = r#"{"chart": {"result": [{}]}}"#;
        mount_chart_mock(&server, "1m", empty).await;
        mount_chart_mock(&server, "1d", empty).await;

        let feed = YahooRateFeed::new(&server.uri());
        let result = feed.latest().await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "No quote data available for PEN=X"
        );
    }

    #[tokio::test]
    async fn test_history_parses_daily_closes_with_gaps() {
        let server = MockServer::start().await;
        // 2025-01-01, 2025-01-02, 2025-01-03 with a null close in the middle
        let body = chart_body(&[1_735_689_600, 1_735_776_000, 1_735_862_400], &[
            Some(3.70),
            None,
            Some(3.74),
        ]);
        mount_chart_mock(&server, "1d", &body).await;

        let feed = YahooRateFeed::new(&server.uri());
        let series = feed.history(30).await.unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(
            series[0].date,
            chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
        assert_eq!(series[0].close, 3.70);
        assert_eq!(
            series[1].date,
            chrono::NaiveDate::from_ymd_opt(2025, 1, 3).unwrap()
        );
        assert_eq!(series[1].close, 3.74);
    }

    #[tokio::test]
    async fn test_history_empty_series_is_not_an_error() {
        let server = MockServer::start().await;
        let body = r#"{"chart": {"result": [{}]}}"#;
        mount_chart_mock(&server, "1d", body).await;

        let feed = YahooRateFeed::new(&server.uri());
        let series = feed.history(7).await.unwrap();
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn test_history_no_chart_result_is_an_error() {
        let server = MockServer::start().await;
        let body = r#"{"chart": {"result": []}}"#;
        mount_chart_mock(&server, "1d", body).await;

        let feed = YahooRateFeed::new(&server.uri());
        let result = feed.history(7).await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "No chart data found for symbol: PEN=X"
        );
    }

    #[tokio::test]
    async fn test_history_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CHART_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let feed = YahooRateFeed::new(&server.uri());
        let result = feed.history(7).await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error for symbol: PEN=X"
        );
    }

    #[tokio::test]
    async fn test_history_malformed_response() {
        let server = MockServer::start().await;
        // "results" instead of "result"
        let body = r#"{"chart": {"results": []}}"#;
        mount_chart_mock(&server, "1d", body).await;

        let feed = YahooRateFeed::new(&server.uri());
        let result = feed.history(7).await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for PEN=X")
        );
    }
}
