// Force index: EMA of (close change × volume)
use super::{window, IndicatorCalculator};
use serde_json::Value;
use shared::models::Candle;

pub struct ForceIndex {
    name: String,
    period: usize,
}

impl ForceIndex {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("FI({})", period),
            period,
        }
    }
}

impl Default for ForceIndex {
    fn default() -> Self {
        ForceIndex::new(13)
    }
}

impl IndicatorCalculator for ForceIndex {
    type Output = Option<f64>;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        let raw: Vec<Option<f64>> = data
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let prev = data.get(i.checked_sub(1)?)?;
                Some((c.close - prev.close) * c.volume)
            })
            .collect();
        window::ema(&raw, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::hlcv;

    #[test]
    fn test_force_index_constant_push() {
        // Close rises by 1 each bar on volume 10: raw force is 10 throughout.
        let rows: Vec<_> = (0..20).map(|i| {
            let c = 100.0 + i as f64;
            (c, c, c, 10.0)
        }).collect();
        let values = ForceIndex::default().calculate(&hlcv(&rows));
        assert!(values[12].is_none());
        assert_eq!(values[13], Some(10.0));
        assert!((values[19].unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_force_index_sign_follows_direction() {
        let rows: Vec<_> = (0..20).map(|i| {
            let c = 200.0 - i as f64 * 2.0;
            (c, c, c, 5.0)
        }).collect();
        let values = ForceIndex::new(3).calculate(&hlcv(&rows));
        assert!(values[19].unwrap() < 0.0);
    }
}
