// signal-watch: polls market data and logs signal reports until interrupted.
use anyhow::{Context, Result};
use clap::Parser;
use engine::alerts::TracingSink;
use engine::config::{EngineSettings, ProviderSettings};
use engine::data::{MarketDataProvider, MarketDataStore, UpbitClient};
use engine::watcher::Watcher;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod report;

/// Polls market data and logs signal reports until interrupted.
#[derive(Parser, Debug)]
#[command(name = "signal-watch", version)]
struct Cli {
    /// JSON settings file; built-in defaults when omitted.
    #[arg(env = "SIGNAL_ENGINE_CONFIG")]
    config: Option<PathBuf>,
}

fn build_provider(settings: &EngineSettings) -> Result<Arc<dyn MarketDataProvider>> {
    match &settings.provider {
        ProviderSettings::Upbit { base_url, timeout_secs } => {
            info!(base_url = %base_url, "Using Upbit market data");
            let client = UpbitClient::new(base_url.clone(), Duration::from_secs(*timeout_secs))
                .context("Failed to build HTTP client")?;
            Ok(Arc::new(client))
        }
        ProviderSettings::Csv { feeds } => {
            info!(feeds = feeds.len(), "Using offline CSV market data");
            let store = MarketDataStore::from_feeds(feeds).context("Failed to load CSV feeds")?;
            Ok(Arc::new(store))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = EngineSettings::load(cli.config.as_deref()).context("Failed to load settings")?;
    info!(
        base_tickers = ?settings.base_tickers,
        interval = %settings.interval,
        profile = ?settings.profile,
        poll_secs = settings.poll_interval_secs,
        "Starting signal watch"
    );

    let provider = build_provider(&settings)?;
    let mut watcher = Watcher::new(settings, provider, Arc::new(TracingSink));
    watcher.run(report::render_cycle).await?;

    info!("Signal watch stopped");
    Ok(())
}
