// Technical indicators module
pub mod adx;
pub mod bollinger;
pub mod channel;
pub mod force_index;
pub mod ichimoku;
pub mod macd;
pub mod obv;
pub mod pipeline;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod window;

pub use adx::{Adx, AdxPoint};
pub use bollinger::{BandPoint, BollingerBands};
pub use channel::{ChannelPoint, PriceChannel};
pub use force_index::ForceIndex;
pub use ichimoku::{Ichimoku, IchimokuPoint};
pub use macd::{Macd, MacdPoint};
pub use obv::Obv;
pub use pipeline::{IndicatorPipeline, IndicatorProfile, IndicatorRow};
pub use roc::Roc;
pub use rsi::Rsi;
pub use sma::Sma;
pub use stochastic::{StochPoint, Stochastic};

use serde_json::Value;
use shared::models::Candle;

/// Common trait for all indicators.
///
/// `calculate` returns exactly one output per input candle. Single-line
/// indicators use `Option<f64>`; multi-line indicators use a point struct whose
/// fields are individually optional. `None` marks rows without enough history.
pub trait IndicatorCalculator: Send + Sync {
    type Output: Copy;

    fn name(&self) -> &str;
    fn parameters(&self) -> Value;
    fn calculate(&self, data: &[Candle]) -> Vec<Self::Output>;
}

pub(crate) fn closes(data: &[Candle]) -> Vec<f64> {
    data.iter().map(|c| c.close).collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, TimeZone, Utc};
    use shared::models::Candle;

    pub fn create_candle(close: f64) -> Candle {
        Candle {
            timestamp: Utc::now(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }

    /// Candles one minute apart with explicit high/low/close/volume.
    pub fn hlcv(rows: &[(f64, f64, f64, f64)]) -> Vec<Candle> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        rows.iter()
            .enumerate()
            .map(|(i, &(high, low, close, volume))| Candle {
                timestamp: start + Duration::minutes(i as i64),
                open: close,
                high,
                low,
                close,
                volume,
            })
            .collect()
    }

    pub fn closes_to_candles(closes: &[f64]) -> Vec<Candle> {
        let rows: Vec<_> = closes.iter().map(|&c| (c, c, c, 1.0)).collect();
        hlcv(&rows)
    }
}
