// Upbit REST client (public quotation endpoints only, no authentication).
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shared::models::{Candle, Series, TimeFrame};

use super::MarketDataProvider;
use crate::error::{EngineError, Result};

/// Largest page the candle endpoints return.
const MAX_PAGE: usize = 200;

pub struct UpbitClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Ticker {
    market: String,
    trade_price: f64,
}

#[derive(Debug, Deserialize)]
struct MarketInfo {
    market: String,
}

#[derive(Debug, Deserialize)]
struct UpbitCandle {
    candle_date_time_utc: String,
    opening_price: f64,
    high_price: f64,
    low_price: f64,
    trade_price: f64,
    candle_acc_trade_volume: f64,
}

impl UpbitCandle {
    fn to_candle(&self) -> Result<Candle> {
        let naive = NaiveDateTime::parse_from_str(&self.candle_date_time_utc, "%Y-%m-%dT%H:%M:%S")
            .map_err(|e| {
                EngineError::ProviderError(format!(
                    "bad candle timestamp '{}': {}",
                    self.candle_date_time_utc, e
                ))
            })?;
        Ok(Candle {
            timestamp: DateTime::from_naive_utc_and_offset(naive, Utc),
            open: self.opening_price,
            high: self.high_price,
            low: self.low_price,
            close: self.trade_price,
            volume: self.candle_acc_trade_volume,
        })
    }
}

impl UpbitClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn candles_path(interval: TimeFrame) -> String {
        match interval.minutes() {
            Some(unit) => format!("/v1/candles/minutes/{}", unit),
            None => match interval {
                TimeFrame::Week => "/v1/candles/weeks".to_string(),
                TimeFrame::Month => "/v1/candles/months".to_string(),
                _ => "/v1/candles/days".to_string(),
            },
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::HttpError {
                url,
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl MarketDataProvider for UpbitClient {
    async fn current_price(&self, asset: &str) -> Result<Option<f64>> {
        let tickers: Vec<Ticker> = self
            .get_json("/v1/ticker", &[("markets", asset.to_string())])
            .await?;
        Ok(tickers
            .into_iter()
            .find(|t| t.market == asset)
            .map(|t| t.trade_price))
    }

    /// Pages backwards from now with `to` until `count` candles are collected
    /// or the exchange runs out of history.
    async fn ohlcv(&self, asset: &str, interval: TimeFrame, count: usize) -> Result<Option<Series>> {
        let path = Self::candles_path(interval);
        let mut candles: Vec<Candle> = Vec::with_capacity(count);
        let mut to: Option<DateTime<Utc>> = None;

        while candles.len() < count {
            let page_size = (count - candles.len()).min(MAX_PAGE);
            let mut query = vec![
                ("market", asset.to_string()),
                ("count", page_size.to_string()),
            ];
            if let Some(to) = to {
                query.push(("to", to.format("%Y-%m-%dT%H:%M:%SZ").to_string()));
            }

            let page: Vec<UpbitCandle> = self.get_json(&path, &query).await?;
            let received = page.len();
            // Newest first; the last entry is the oldest.
            for raw in &page {
                candles.push(raw.to_candle()?);
            }
            tracing::trace!(asset, %interval, received, total = candles.len(), "Fetched candle page");

            match candles.iter().map(|c| c.timestamp).min() {
                Some(oldest) if received == page_size => to = Some(oldest),
                _ => break,
            }
        }

        if candles.is_empty() {
            return Ok(None);
        }
        Ok(Some(Series::new(asset, interval, candles).truncate_front(count)))
    }

    async fn list_assets(&self, quote: &str) -> Result<Vec<String>> {
        let markets: Vec<MarketInfo> = self
            .get_json("/v1/market/all", &[("isDetails", "false".to_string())])
            .await?;
        let prefix = format!("{}-", quote);
        Ok(markets
            .into_iter()
            .map(|m| m.market)
            .filter(|m| m.starts_with(&prefix))
            .collect())
    }
}
