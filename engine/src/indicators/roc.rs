// Rate of Change, in percent
use super::IndicatorCalculator;
use serde_json::Value;
use shared::models::Candle;

pub struct Roc {
    name: String,
    period: usize,
}

impl Roc {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("ROC({})", period),
            period,
        }
    }
}

impl Default for Roc {
    fn default() -> Self {
        Roc::new(10)
    }
}

impl IndicatorCalculator for Roc {
    type Output = Option<f64>;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        data.iter()
            .enumerate()
            .map(|(i, c)| {
                let past = data.get(i.checked_sub(self.period)?)?.close;
                if past == 0.0 {
                    return None;
                }
                Some(100.0 * (c.close - past) / past)
            })
            .collect()
    }
}
