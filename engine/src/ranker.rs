// Ranks listed assets by latest daily traded value (close × volume).
use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::data::SeriesFetcher;

pub struct TickerRanker {
    fetcher: SeriesFetcher,
    quote: String,
    fan_out: usize,
    spacing: Duration,
}

impl TickerRanker {
    /// `fan_out` bounds the daily-candle fetches in flight; `spacing` separates
    /// the start of consecutive fetches whatever the fan-out.
    pub fn new(fetcher: SeriesFetcher, quote: impl Into<String>, fan_out: usize, spacing: Duration) -> Self {
        Self {
            fetcher,
            quote: quote.into(),
            fan_out: fan_out.max(1),
            spacing,
        }
    }

    /// At most `n` assets, highest traded value first. Assets whose daily
    /// candle cannot be fetched are left out; equal values keep listing order.
    pub async fn top_by_value(&self, n: usize) -> Vec<String> {
        if n == 0 {
            return Vec::new();
        }
        let listing = self.fetcher.list_assets(&self.quote).await;
        if listing.is_empty() {
            tracing::warn!(quote = %self.quote, "No assets listed, ranking skipped");
            return Vec::new();
        }
        let candidates = listing.len();

        let fetcher = &self.fetcher;
        let spacing = self.spacing;
        let mut ranked: Vec<(usize, String, f64)> = stream::iter(listing.into_iter().enumerate())
            // Paced upstream of the buffer, so starts stay `spacing` apart.
            .then(move |(position, asset)| async move {
                if position > 0 && !spacing.is_zero() {
                    tokio::time::sleep(spacing).await;
                }
                (position, asset)
            })
            .map(move |(position, asset)| async move {
                let value = fetcher.fetch_daily(&asset).await.map(|c| c.traded_value());
                (position, asset, value)
            })
            .buffer_unordered(self.fan_out)
            .filter_map(|(position, asset, value)| async move {
                match value.filter(|v| v.is_finite()) {
                    Some(v) => Some((position, asset, v)),
                    None => {
                        tracing::debug!(asset = %asset, "Excluded from ranking, no daily data");
                        None
                    }
                }
            })
            .collect()
            .await;

        ranked.sort_by(|a, b| b.2.total_cmp(&a.2).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(n);

        tracing::info!(
            quote = %self.quote,
            candidates,
            top = ?ranked.iter().map(|(_, a, _)| a.as_str()).collect::<Vec<_>>(),
            "Ranked assets by traded value"
        );
        ranked.into_iter().map(|(_, asset, _)| asset).collect()
    }
}
