// Per-asset evaluation cycle and the state it carries between cycles.
use shared::models::{AlertDirection, TimeFrame};

use crate::alerts::{AlertEvent, AlertKind, AlertRegistry, AlertSink, VolumeState};
use crate::config::EngineSettings;
use crate::data::SeriesFetcher;
use crate::indicators::{IndicatorPipeline, IndicatorProfile};
use crate::signals::{SignalAggregator, SignalResult};

/// Owns everything one asset remembers across cycles: pending price alerts,
/// the last seen volume and the last score. Nothing here is shared.
pub struct AssetMonitor {
    asset: String,
    interval: TimeFrame,
    candle_count: usize,
    pipeline: IndicatorPipeline,
    aggregator: SignalAggregator,
    alerts: AlertRegistry,
    volume: VolumeState,
    cross_threshold: i32,
    last_score: Option<i32>,
}

impl AssetMonitor {
    pub fn new(asset: impl Into<String>, settings: &EngineSettings) -> Self {
        Self::with_profile(
            asset,
            settings.interval,
            settings.candle_count,
            settings.profile,
            settings.volume_surge_threshold,
            settings.signal_cross_threshold,
        )
    }

    pub fn with_profile(
        asset: impl Into<String>,
        interval: TimeFrame,
        candle_count: usize,
        profile: IndicatorProfile,
        volume_surge_threshold: f64,
        cross_threshold: i32,
    ) -> Self {
        Self {
            asset: asset.into(),
            interval,
            candle_count,
            pipeline: IndicatorPipeline::new(profile),
            aggregator: SignalAggregator::new(profile),
            alerts: AlertRegistry::new(),
            volume: VolumeState::new(volume_surge_threshold),
            cross_threshold,
            last_score: None,
        }
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn alerts(&self) -> &AlertRegistry {
        &self.alerts
    }

    pub fn last_score(&self) -> Option<i32> {
        self.last_score
    }

    pub fn register_alert(&mut self, target: f64, direction: AlertDirection) {
        tracing::info!(asset = %self.asset, target_price = target, %direction, "Price alert registered");
        self.alerts.register(target, direction);
    }

    /// One evaluation: price, history, indicators, volume surge, price
    /// alerts, then the score. Any missing input ends the cycle for this
    /// asset with `None`; alert state is left untouched in that case.
    pub async fn run_cycle(&mut self, fetcher: &SeriesFetcher, sink: &dyn AlertSink) -> Option<SignalResult> {
        let Some(price) = fetcher.fetch_price(&self.asset).await else {
            tracing::warn!(asset = %self.asset, "No current price, skipping this cycle");
            return None;
        };
        let Some(series) = fetcher
            .fetch_series(&self.asset, self.interval, self.candle_count)
            .await
        else {
            tracing::warn!(asset = %self.asset, interval = %self.interval, "No candle history, skipping this cycle");
            return None;
        };
        let rows = self.pipeline.compute(&series)?;

        if let Some(latest) = series.latest() {
            let check = self.volume.check_volume_surge(latest.volume);
            if let (true, Some(ratio)) = (check.surged, check.ratio) {
                sink.publish(&AlertEvent {
                    asset: self.asset.clone(),
                    kind: AlertKind::VolumeSurge {
                        ratio,
                        volume: latest.volume,
                    },
                });
            }
        }

        for fired in self.alerts.check(price) {
            sink.publish(&AlertEvent {
                asset: self.asset.clone(),
                kind: AlertKind::PriceCrossed {
                    target: fired.target,
                    direction: fired.direction,
                    price,
                },
            });
        }

        let result = self.aggregator.evaluate_latest(&self.asset, &rows, Some(price))?;
        let previous = self.last_score.replace(result.score);
        if is_signal_crossing(previous, result.score, self.cross_threshold) {
            sink.publish(&AlertEvent {
                asset: self.asset.clone(),
                kind: AlertKind::SignalCrossed {
                    score: result.score,
                    previous,
                },
            });
        }
        tracing::debug!(asset = %self.asset, score = result.score, price, "Evaluated signals");
        Some(result)
    }
}

/// The score reached `threshold` from below it. No earlier score counts as below.
fn is_signal_crossing(previous: Option<i32>, score: i32, threshold: i32) -> bool {
    score >= threshold && previous.map_or(true, |p| p < threshold)
}
