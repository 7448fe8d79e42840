// The polling loop: refresh the watch set, evaluate every monitor in turn.
use std::future::Future;
use std::sync::Arc;

use shared::models::AlertDirection;

use crate::alerts::AlertSink;
use crate::config::EngineSettings;
use crate::data::{MarketDataProvider, SeriesFetcher};
use crate::error::Result;
use crate::monitor::AssetMonitor;
use crate::ranker::TickerRanker;
use crate::signals::SignalResult;

/// Outcome of one pass over the watch set.
#[derive(Debug, Clone, Default)]
pub struct CycleSummary {
    /// Assets newly added from the ranking this cycle.
    pub added: Vec<String>,
    pub results: Vec<SignalResult>,
    /// Assets that produced no result this cycle.
    pub skipped: Vec<String>,
}

pub struct Watcher {
    settings: EngineSettings,
    fetcher: SeriesFetcher,
    ranker: Option<TickerRanker>,
    monitors: Vec<AssetMonitor>,
    sink: Arc<dyn AlertSink>,
}

impl Watcher {
    /// Creates monitors for the base tickers and registers the configured
    /// price alerts. An alert for an unwatched asset adds it to the watch set.
    pub fn new(settings: EngineSettings, provider: Arc<dyn MarketDataProvider>, sink: Arc<dyn AlertSink>) -> Self {
        let fetcher = SeriesFetcher::new(provider, settings.retry.policy());
        let ranker = settings.ranking.enabled.then(|| {
            TickerRanker::new(
                fetcher.clone(),
                settings.ranking.quote_currency.clone(),
                settings.ranking.fan_out,
                settings.request_spacing(),
            )
        });

        let mut watcher = Self {
            settings,
            fetcher,
            ranker,
            monitors: Vec::new(),
            sink,
        };
        for asset in watcher.settings.base_tickers.clone() {
            watcher.watch(&asset);
        }
        for alert in watcher.settings.alerts.clone() {
            watcher.register_alert(&alert.asset, alert.target_price, alert.direction);
        }
        watcher
    }

    /// Starts watching `asset`; returns false when it is already watched.
    pub fn watch(&mut self, asset: &str) -> bool {
        if self.monitors.iter().any(|m| m.asset() == asset) {
            return false;
        }
        tracing::info!(asset, "Watching asset");
        self.monitors.push(AssetMonitor::new(asset, &self.settings));
        true
    }

    pub fn register_alert(&mut self, asset: &str, target: f64, direction: AlertDirection) {
        self.watch(asset);
        if let Some(monitor) = self.monitors.iter_mut().find(|m| m.asset() == asset) {
            monitor.register_alert(target, direction);
        }
    }

    /// Watched assets in insertion order.
    pub fn watched(&self) -> Vec<&str> {
        self.monitors.iter().map(AssetMonitor::asset).collect()
    }

    pub fn monitor(&self, asset: &str) -> Option<&AssetMonitor> {
        self.monitors.iter().find(|m| m.asset() == asset)
    }

    /// Adds the current top assets by traded value. Assets are never removed.
    pub async fn refresh_watch_set(&mut self) -> Vec<String> {
        let Some(ranker) = &self.ranker else {
            return Vec::new();
        };
        let top = ranker.top_by_value(self.settings.ranking.top_n).await;
        if top.is_empty() {
            tracing::warn!("Top traded assets unavailable this cycle");
        }
        top.into_iter().filter(|asset| self.watch(asset)).collect()
    }

    /// Refreshes the watch set, then evaluates every monitor sequentially.
    /// A failure for one asset only skips that asset.
    pub async fn run_cycle(&mut self) -> CycleSummary {
        let added = self.refresh_watch_set().await;
        let mut summary = CycleSummary {
            added,
            ..CycleSummary::default()
        };

        for monitor in self.monitors.iter_mut() {
            match monitor.run_cycle(&self.fetcher, self.sink.as_ref()).await {
                Some(result) => summary.results.push(result),
                None => {
                    tracing::warn!(asset = %monitor.asset(), "Analysis unavailable this cycle");
                    summary.skipped.push(monitor.asset().to_string());
                }
            }
        }
        tracing::info!(
            evaluated = summary.results.len(),
            skipped = summary.skipped.len(),
            "Cycle complete"
        );
        summary
    }

    /// Runs cycles until Ctrl-C. The interrupt is honoured between cycles; a
    /// cycle in progress always completes.
    pub async fn run<F>(&mut self, on_cycle: F) -> Result<()>
    where
        F: FnMut(&CycleSummary),
    {
        let interrupt = tokio::spawn(tokio::signal::ctrl_c());
        self.run_until(interrupt_signal(interrupt), on_cycle).await;
        Ok(())
    }

    /// Runs cycles every poll interval until `shutdown` completes. `shutdown`
    /// is only observed between cycles.
    pub async fn run_until<S, F>(&mut self, shutdown: S, mut on_cycle: F)
    where
        S: Future<Output = ()>,
        F: FnMut(&CycleSummary),
    {
        tokio::pin!(shutdown);
        let poll = self.settings.poll_interval();
        loop {
            let summary = self.run_cycle().await;
            on_cycle(&summary);

            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(poll) => {}
            }
        }
        tracing::info!("Watcher stopped");
    }
}

/// Completes when the listener reports an interrupt. A failed listener never
/// completes, so the loop keeps running.
async fn interrupt_signal<E, J>(listener: impl Future<Output = std::result::Result<std::result::Result<(), E>, J>>)
where
    E: std::fmt::Display,
    J: std::fmt::Display,
{
    match listener.await {
        Ok(Ok(())) => {
            tracing::info!("Interrupt received, stopping after this cycle");
            return;
        }
        Ok(Err(e)) => tracing::error!(error = %e, "Failed to listen for Ctrl-C, running until killed"),
        Err(e) => tracing::error!(error = %e, "Interrupt listener task failed, running until killed"),
    }
    std::future::pending::<()>().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::AlertKind;
    use crate::config::AlertSetting;
    use crate::data::mock::MockProvider;
    use crate::indicators::test_support::hlcv;
    use crate::monitor::tests::{uptrend, RecordingSink};
    use shared::models::TimeFrame;
    use std::time::Duration;

    fn settings() -> EngineSettings {
        let mut settings = EngineSettings::default();
        settings.base_tickers = vec!["KRW-BTC".to_string(), "KRW-DOGE".to_string()];
        settings.candle_count = 150;
        settings.retry.delay_ms = 1;
        settings.ranking.top_n = 2;
        settings.ranking.request_spacing_ms = 0;
        settings.alerts = vec![AlertSetting {
            asset: "KRW-BTC".to_string(),
            target_price: 200.0,
            direction: AlertDirection::Above,
        }];
        settings
    }

    fn provider() -> MockProvider {
        let daily = |c: f64, v: f64| hlcv(&[(c, c, c, v)]);
        MockProvider::new()
            .with_listing(&["KRW-BTC", "KRW-XRP", "KRW-ETH"])
            .with_prices("KRW-BTC", &[250.0])
            .with_prices("KRW-XRP", &[240.0])
            .with_series("KRW-BTC", TimeFrame::Minute60, uptrend(150, 100.0))
            .with_series("KRW-XRP", TimeFrame::Minute60, uptrend(150, 100.0))
            .with_series("KRW-BTC", TimeFrame::Day, daily(100.0, 10.0))
            .with_series("KRW-XRP", TimeFrame::Day, daily(100.0, 50.0))
            .with_series("KRW-ETH", TimeFrame::Day, daily(100.0, 20.0))
    }

    #[tokio::test]
    async fn test_cycle_isolates_failing_asset() {
        let sink = Arc::new(RecordingSink::default());
        let mut watcher = Watcher::new(settings(), Arc::new(provider()), sink.clone());
        assert_eq!(watcher.watched(), vec!["KRW-BTC", "KRW-DOGE"]);

        let summary = watcher.run_cycle().await;
        // Ranked: XRP then ETH; BTC is already watched.
        assert_eq!(summary.added, vec!["KRW-XRP", "KRW-ETH"]);
        assert_eq!(watcher.watched(), vec!["KRW-BTC", "KRW-DOGE", "KRW-XRP", "KRW-ETH"]);

        let evaluated: Vec<&str> = summary.results.iter().map(|r| r.asset.as_str()).collect();
        assert_eq!(evaluated, vec!["KRW-BTC", "KRW-XRP"]);
        // DOGE and ETH have no price or history.
        assert_eq!(summary.skipped, vec!["KRW-DOGE", "KRW-ETH"]);

        let price_alerts = sink
            .kinds()
            .into_iter()
            .filter(|k| matches!(k, AlertKind::PriceCrossed { .. }))
            .count();
        assert_eq!(price_alerts, 1);
        assert!(watcher.monitor("KRW-BTC").unwrap().alerts().is_empty());
    }

    #[tokio::test]
    async fn test_watch_set_only_grows() {
        let mut watcher = Watcher::new(settings(), Arc::new(provider()), Arc::new(RecordingSink::default()));
        watcher.run_cycle().await;
        let second = watcher.run_cycle().await;
        assert!(second.added.is_empty());
        assert_eq!(watcher.watched().len(), 4);
    }

    #[tokio::test]
    async fn test_ranking_disabled_keeps_base_tickers() {
        let mut settings = settings();
        settings.ranking.enabled = false;
        let mut watcher = Watcher::new(settings, Arc::new(provider()), Arc::new(RecordingSink::default()));
        let summary = watcher.run_cycle().await;
        assert!(summary.added.is_empty());
        assert_eq!(watcher.watched(), vec!["KRW-BTC", "KRW-DOGE"]);
    }

    #[test]
    fn test_alert_for_unwatched_asset_adds_monitor() {
        let mut settings = settings();
        settings.alerts.push(AlertSetting {
            asset: "KRW-SOL".to_string(),
            target_price: 1000.0,
            direction: AlertDirection::Below,
        });
        let watcher = Watcher::new(settings, Arc::new(provider()), Arc::new(RecordingSink::default()));
        assert_eq!(watcher.watched(), vec!["KRW-BTC", "KRW-DOGE", "KRW-SOL"]);
        assert_eq!(watcher.monitor("KRW-SOL").unwrap().alerts().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_interrupt_listener_never_stops_the_loop() {
        let failed = async { Ok::<Result<()>, String>(Err(crate::EngineError::ConfigError("no signal".into()))) };
        let waited = tokio::time::timeout(Duration::from_millis(50), interrupt_signal(failed)).await;
        assert!(waited.is_err());

        let crashed = async { Err::<Result<()>, String>("listener panicked".to_string()) };
        let waited = tokio::time::timeout(Duration::from_millis(50), interrupt_signal(crashed)).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_interrupt_stops_the_loop_after_a_cycle() {
        let mut settings = settings();
        settings.ranking.enabled = false;
        let mut watcher = Watcher::new(settings, Arc::new(provider()), Arc::new(RecordingSink::default()));
        let mut cycles = 0;
        let received = async { Ok::<std::io::Result<()>, String>(Ok(())) };
        watcher.run_until(interrupt_signal(received), |_| cycles += 1).await;
        assert_eq!(cycles, 1);
    }

    #[tokio::test]
    async fn test_run_until_completes_cycle_before_stopping() {
        let mut settings = settings();
        settings.ranking.enabled = false;
        let mut watcher = Watcher::new(settings, Arc::new(provider()), Arc::new(RecordingSink::default()));
        let mut cycles = 0;
        watcher.run_until(async {}, |_| cycles += 1).await;
        assert_eq!(cycles, 1);
    }
}
