// Indicator pipeline: candle series in, one indicator row per candle out.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::models::Series;

use super::{
    window, Adx, BollingerBands, ForceIndex, Ichimoku, IndicatorCalculator, Macd, Obv,
    PriceChannel, Roc, Rsi, Sma, Stochastic,
};

/// Which indicator set is computed and which rule set scores it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorProfile {
    /// Every indicator, scored by the ten-rule set.
    #[default]
    Full,
    /// RSI, MACD and MA5/MA20 only, scored by the three-rule set.
    Light,
}

impl IndicatorProfile {
    /// Shortest series `compute` accepts.
    pub fn min_candles(&self) -> usize {
        match self {
            IndicatorProfile::Full => 60,
            IndicatorProfile::Light => 20,
        }
    }

    /// Candles needed for every indicator in the profile to be defined on the
    /// latest row.
    pub fn recommended_candles(&self) -> usize {
        match self {
            IndicatorProfile::Full => 120,
            IndicatorProfile::Light => 34,
        }
    }
}

/// Indicator values for one candle. `None` until the indicator has enough
/// history, and always `None` for indicators outside the active profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub volume: f64,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub ma5: Option<f64>,
    pub ma20: Option<f64>,
    pub ma60: Option<f64>,
    pub ma120: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub adx: Option<f64>,
    pub plus_di: Option<f64>,
    pub minus_di: Option<f64>,
    pub obv: Option<f64>,
    pub obv_ma: Option<f64>,
    pub ichimoku_conversion: Option<f64>,
    pub ichimoku_base: Option<f64>,
    pub ichimoku_span_a: Option<f64>,
    pub ichimoku_span_b: Option<f64>,
    pub roc: Option<f64>,
    pub channel_high: Option<f64>,
    pub channel_low: Option<f64>,
    pub force_index: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorPipeline {
    profile: IndicatorProfile,
}

impl IndicatorPipeline {
    pub fn new(profile: IndicatorProfile) -> Self {
        Self { profile }
    }

    /// Computes the indicator rows for `series`.
    ///
    /// Returns `None` when the series is shorter than the profile minimum or
    /// holds non-finite values. Pure: identical input gives identical output.
    pub fn compute(&self, series: &Series) -> Option<Vec<IndicatorRow>> {
        let candles = series.candles();
        let min = self.profile.min_candles();
        if candles.len() < min {
            tracing::debug!(
                asset = %series.asset(),
                interval = %series.interval(),
                len = candles.len(),
                min,
                "Not enough candles for indicator computation"
            );
            return None;
        }
        if let Some(bad) = candles.iter().find(|c| !c.is_finite()) {
            tracing::error!(
                asset = %series.asset(),
                interval = %series.interval(),
                timestamp = %bad.timestamp,
                "Non-finite candle values, skipping indicator computation"
            );
            return None;
        }

        let rsi = Rsi::new(14).calculate(candles);
        let macd = Macd::default().calculate(candles);
        let ma5 = Sma::new(5).calculate(candles);
        let ma20 = Sma::new(20).calculate(candles);

        let mut rows: Vec<IndicatorRow> = candles
            .iter()
            .enumerate()
            .map(|(i, c)| IndicatorRow {
                timestamp: c.timestamp,
                close: c.close,
                volume: c.volume,
                rsi: rsi[i],
                macd: macd[i].line,
                macd_signal: macd[i].signal,
                macd_hist: macd[i].histogram,
                ma5: ma5[i],
                ma20: ma20[i],
                ..IndicatorRow::default()
            })
            .collect();

        if self.profile == IndicatorProfile::Full {
            let ma60 = Sma::new(60).calculate(candles);
            let ma120 = Sma::new(120).calculate(candles);
            let bands = BollingerBands::default().calculate(candles);
            let stoch = Stochastic::default().calculate(candles);
            let adx = Adx::default().calculate(candles);
            let obv = Obv::new().calculate(candles);
            let obv_ma = window::rolling_mean_opt(&obv, 20);
            let ichimoku = Ichimoku::default().calculate(candles);
            let roc = Roc::default().calculate(candles);
            let channel = PriceChannel::default().calculate(candles);
            let force = ForceIndex::default().calculate(candles);

            for (i, row) in rows.iter_mut().enumerate() {
                row.ma60 = ma60[i];
                row.ma120 = ma120[i];
                row.bb_upper = bands[i].upper;
                row.bb_middle = bands[i].middle;
                row.bb_lower = bands[i].lower;
                row.stoch_k = stoch[i].k;
                row.stoch_d = stoch[i].d;
                row.adx = adx[i].adx;
                row.plus_di = adx[i].plus_di;
                row.minus_di = adx[i].minus_di;
                row.obv = obv[i];
                row.obv_ma = obv_ma[i];
                row.ichimoku_conversion = ichimoku[i].conversion;
                row.ichimoku_base = ichimoku[i].base;
                row.ichimoku_span_a = ichimoku[i].span_a;
                row.ichimoku_span_b = ichimoku[i].span_b;
                row.roc = roc[i];
                row.channel_high = channel[i].upper;
                row.channel_low = channel[i].lower;
                row.force_index = force[i];
            }
        }

        tracing::trace!(asset = %series.asset(), rows = rows.len(), profile = ?self.profile, "Computed indicators");
        Some(rows)
    }
}
