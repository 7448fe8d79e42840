// Price channel (Donchian): highest high and lowest low over a window
use super::{window, IndicatorCalculator};
use serde::Serialize;
use serde_json::Value;
use shared::models::Candle;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChannelPoint {
    pub upper: Option<f64>,
    pub lower: Option<f64>,
}

pub struct PriceChannel {
    name: String,
    period: usize,
}

impl PriceChannel {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("CHANNEL({})", period),
            period,
        }
    }
}

impl Default for PriceChannel {
    fn default() -> Self {
        PriceChannel::new(20)
    }
}

impl IndicatorCalculator for PriceChannel {
    type Output = ChannelPoint;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<ChannelPoint> {
        let highs: Vec<f64> = data.iter().map(|c| c.high).collect();
        let lows: Vec<f64> = data.iter().map(|c| c.low).collect();
        window::rolling_max(&highs, self.period)
            .into_iter()
            .zip(window::rolling_min(&lows, self.period))
            .map(|(upper, lower)| ChannelPoint { upper, lower })
            .collect()
    }
}
