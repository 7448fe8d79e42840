// Stochastic oscillator (%K / %D)
use super::{window, IndicatorCalculator};
use serde::Serialize;
use serde_json::Value;
use shared::models::Candle;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StochPoint {
    pub k: Option<f64>,
    pub d: Option<f64>,
}

pub struct Stochastic {
    name: String,
    k_period: usize,
    d_period: usize,
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize) -> Self {
        Self {
            name: format!("STOCH({},{})", k_period, d_period),
            k_period,
            d_period,
        }
    }
}

impl Default for Stochastic {
    fn default() -> Self {
        Stochastic::new(14, 3)
    }
}

impl IndicatorCalculator for Stochastic {
    type Output = StochPoint;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "k_period": self.k_period, "d_period": self.d_period })
    }

    /// %K = 100 × (close − lowest low) / (highest high − lowest low). A window
    /// with no range puts %K at 50.
    fn calculate(&self, data: &[Candle]) -> Vec<StochPoint> {
        let highs: Vec<f64> = data.iter().map(|c| c.high).collect();
        let lows: Vec<f64> = data.iter().map(|c| c.low).collect();
        let highest = window::rolling_max(&highs, self.k_period);
        let lowest = window::rolling_min(&lows, self.k_period);

        let k: Vec<Option<f64>> = data
            .iter()
            .zip(highest.iter().zip(&lowest))
            .map(|(candle, (hh, ll))| {
                let (hh, ll) = ((*hh)?, (*ll)?);
                let range = hh - ll;
                if range == 0.0 {
                    Some(50.0)
                } else {
                    Some(100.0 * (candle.close - ll) / range)
                }
            })
            .collect();
        let d = window::rolling_mean_opt(&k, self.d_period);

        k.into_iter()
            .zip(d)
            .map(|(k, d)| StochPoint { k, d })
            .collect()
    }
}
