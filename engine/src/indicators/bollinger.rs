// Bollinger Bands
use super::{closes, window, IndicatorCalculator};
use serde::Serialize;
use serde_json::Value;
use shared::models::Candle;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BandPoint {
    pub upper: Option<f64>,
    pub middle: Option<f64>,
    pub lower: Option<f64>,
}

pub struct BollingerBands {
    name: String,
    period: usize,
    width: f64,
}

impl BollingerBands {
    pub fn new(period: usize, width: f64) -> Self {
        Self {
            name: format!("BB({},{})", period, width),
            period,
            width,
        }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        BollingerBands::new(20, 2.0)
    }
}

impl IndicatorCalculator for BollingerBands {
    type Output = BandPoint;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period, "width": self.width })
    }

    // middle ± width × sample standard deviation
    fn calculate(&self, data: &[Candle]) -> Vec<BandPoint> {
        let values = closes(data);
        let middle = window::rolling_mean(&values, self.period);
        let std = window::rolling_sample_std(&values, self.period);

        middle
            .into_iter()
            .zip(std)
            .map(|(middle, std)| match (middle, std) {
                (Some(m), Some(s)) => BandPoint {
                    upper: Some(m + self.width * s),
                    middle: Some(m),
                    lower: Some(m - self.width * s),
                },
                _ => BandPoint::default(),
            })
            .collect()
    }
}
