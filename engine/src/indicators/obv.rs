// On-Balance Volume
use super::IndicatorCalculator;
use serde_json::Value;
use shared::models::Candle;

pub struct Obv {
    name: String,
}

impl Obv {
    pub fn new() -> Self {
        Self { name: "OBV".to_string() }
    }
}

impl Default for Obv {
    fn default() -> Self {
        Obv::new()
    }
}

impl IndicatorCalculator for Obv {
    type Output = Option<f64>;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({})
    }

    /// Running volume total: added on the first bar and whenever the close does
    /// not fall, subtracted when it does.
    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        let mut total = 0.0;
        data.iter()
            .enumerate()
            .map(|(i, c)| {
                let falling = i > 0 && c.close < data[i - 1].close;
                if falling {
                    total -= c.volume;
                } else {
                    total += c.volume;
                }
                Some(total)
            })
            .collect()
    }
}
