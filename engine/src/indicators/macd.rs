// Moving Average Convergence Divergence (MACD)
use super::{closes, window, IndicatorCalculator};
use serde::Serialize;
use serde_json::Value;
use shared::models::Candle;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacdPoint {
    pub line: Option<f64>,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
}

pub struct Macd {
    name: String,
    fast: usize,
    slow: usize,
    signal: usize,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            name: format!("MACD({},{},{})", fast, slow, signal),
            fast,
            slow,
            signal,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Macd::new(12, 26, 9)
    }
}

impl IndicatorCalculator for Macd {
    type Output = MacdPoint;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "fast": self.fast, "slow": self.slow, "signal": self.signal })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<MacdPoint> {
        let values: Vec<Option<f64>> = closes(data).into_iter().map(Some).collect();
        let fast = window::ema(&values, self.fast);
        let slow = window::ema(&values, self.slow);

        let line: Vec<Option<f64>> = fast
            .iter()
            .zip(&slow)
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect();
        let signal = window::ema(&line, self.signal);

        line.iter()
            .zip(&signal)
            .map(|(&line, &signal)| MacdPoint {
                line,
                signal,
                histogram: line.zip(signal).map(|(l, s)| l - s),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::closes_to_candles;

    #[test]
    fn test_macd_warmup_boundaries() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let points = Macd::default().calculate(&closes_to_candles(&closes));
        assert_eq!(points.len(), 40);
        assert!(points[24].line.is_none());
        assert!(points[25].line.is_some());
        assert!(points[32].signal.is_none());
        assert!(points[33].signal.is_some());
        let p = points[39];
        let diff = p.line.unwrap() - p.signal.unwrap();
        assert!((p.histogram.unwrap() - diff).abs() < 1e-12);
    }

    #[test]
    fn test_macd_rising_prices_are_positive() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let points = Macd::default().calculate(&closes_to_candles(&closes));
        let last = points.last().unwrap();
        // A constant slope of 1 lags EMA(n) by (n - 1) / 2, so the spread is 12.5 - 5.5.
        assert!((last.line.unwrap() - 7.0).abs() < 1e-9);
        assert!(last.histogram.unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_macd_short_series_is_undefined() {
        let points = Macd::default().calculate(&closes_to_candles(&[1.0, 2.0, 3.0]));
        assert!(points.iter().all(|p| *p == MacdPoint::default()));
    }
}
