// Engine settings, loaded from a JSON file. Every key is optional; missing keys
// fall back to the defaults below.
use serde::Deserialize;
use shared::models::{AlertDirection, TimeFrame};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{EngineError, Result};
use crate::indicators::pipeline::IndicatorProfile;
use crate::retry::RetryPolicy;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EngineSettings {
    /// Assets watched every cycle regardless of ranking.
    pub base_tickers: Vec<String>,
    pub interval: TimeFrame,
    pub candle_count: usize,
    pub profile: IndicatorProfile,
    pub poll_interval_secs: u64,
    pub retry: RetrySettings,
    pub volume_surge_threshold: f64,
    /// Score at or above which a rising signal is reported as a crossing.
    pub signal_cross_threshold: i32,
    pub ranking: RankingSettings,
    pub alerts: Vec<AlertSetting>,
    pub provider: ProviderSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            base_tickers: vec!["KRW-BTC".to_string(), "KRW-DOGE".to_string()],
            interval: TimeFrame::Minute60,
            candle_count: 200,
            profile: IndicatorProfile::Full,
            poll_interval_secs: 15,
            retry: RetrySettings::default(),
            volume_surge_threshold: 2.0,
            signal_cross_threshold: 2,
            ranking: RankingSettings::default(),
            alerts: Vec::new(),
            provider: ProviderSettings::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetrySettings {
    pub attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        RetrySettings {
            attempts: 3,
            delay_ms: 500,
        }
    }
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.attempts, Duration::from_millis(self.delay_ms))
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RankingSettings {
    pub enabled: bool,
    pub quote_currency: String,
    pub top_n: usize,
    /// Maximum number of candidate fetches in flight at once.
    pub fan_out: usize,
    /// Pause before each candidate fetch, to stay under provider rate limits.
    pub request_spacing_ms: u64,
}

impl Default for RankingSettings {
    fn default() -> Self {
        RankingSettings {
            enabled: true,
            quote_currency: "KRW".to_string(),
            top_n: 3,
            fan_out: 1,
            request_spacing_ms: 100,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AlertSetting {
    pub asset: String,
    pub target_price: f64,
    pub direction: AlertDirection,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderSettings {
    Upbit {
        #[serde(default = "default_upbit_url")]
        base_url: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    Csv {
        feeds: Vec<CsvFeed>,
    },
}

impl Default for ProviderSettings {
    fn default() -> Self {
        ProviderSettings::Upbit {
            base_url: default_upbit_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvFeed {
    pub asset: String,
    pub interval: TimeFrame,
    pub path: PathBuf,
}

fn default_upbit_url() -> String {
    "https://api.upbit.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl EngineSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: EngineSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&raw).map_err(|e| {
            EngineError::ConfigError(format!("Failed to load '{}': {}", path.display(), e))
        })?;
        tracing::info!(path = %path.display(), "Loaded engine settings");
        Ok(settings)
    }

    /// Loads `path` when given, otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                tracing::info!("No settings file given, using defaults");
                let settings = Self::default();
                settings.validate()?;
                Ok(settings)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let min_count = self.profile.recommended_candles();
        if self.candle_count < min_count {
            return Err(EngineError::ConfigError(format!(
                "candle_count {} is below the {} candles the {:?} profile needs",
                self.candle_count, min_count, self.profile
            )));
        }
        if self.retry.attempts == 0 {
            return Err(EngineError::ConfigError(
                "retry.attempts must be at least 1".to_string(),
            ));
        }
        if !(self.volume_surge_threshold.is_finite() && self.volume_surge_threshold > 0.0) {
            return Err(EngineError::ConfigError(format!(
                "volume_surge_threshold must be a positive number, got {}",
                self.volume_surge_threshold
            )));
        }
        if self.poll_interval_secs == 0 {
            return Err(EngineError::ConfigError(
                "poll_interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.ranking.enabled && self.ranking.fan_out == 0 {
            return Err(EngineError::ConfigError(
                "ranking.fan_out must be at least 1".to_string(),
            ));
        }
        if let Some(bad) = self
            .alerts
            .iter()
            .find(|a| !(a.target_price.is_finite() && a.target_price > 0.0))
        {
            return Err(EngineError::ConfigError(format!(
                "alert for {} has invalid target price {}",
                bad.asset, bad.target_price
            )));
        }
        if let ProviderSettings::Csv { feeds } = &self.provider {
            if feeds.is_empty() {
                return Err(EngineError::ConfigError(
                    "csv provider needs at least one feed".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_spacing(&self) -> Duration {
        Duration::from_millis(self.ranking.request_spacing_ms)
    }
}
