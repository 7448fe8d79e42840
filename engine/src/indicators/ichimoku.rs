/// Ichimoku cloud.
///
/// Conversion and base lines are midpoints of the high/low range over 9 and 26
/// bars. Leading span A is the average of those two, leading span B the 52-bar
/// midpoint, and both are plotted `displacement` bars ahead, so the span values
/// at row `i` were computed at row `i - displacement`.
use super::{window, IndicatorCalculator};
use serde::Serialize;
use serde_json::Value;
use shared::models::Candle;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct IchimokuPoint {
    pub conversion: Option<f64>,
    pub base: Option<f64>,
    pub span_a: Option<f64>,
    pub span_b: Option<f64>,
}

pub struct Ichimoku {
    name: String,
    conversion: usize,
    base: usize,
    span_b: usize,
    displacement: usize,
}

impl Ichimoku {
    pub fn new(conversion: usize, base: usize, span_b: usize, displacement: usize) -> Self {
        Self {
            name: format!("ICHIMOKU({},{},{})", conversion, base, span_b),
            conversion,
            base,
            span_b,
            displacement,
        }
    }

    fn midpoints(highs: &[f64], lows: &[f64], period: usize) -> Vec<Option<f64>> {
        window::rolling_max(highs, period)
            .into_iter()
            .zip(window::rolling_min(lows, period))
            .map(|(h, l)| Some((h? + l?) / 2.0))
            .collect()
    }
}

impl Default for Ichimoku {
    fn default() -> Self {
        Ichimoku::new(9, 26, 52, 26)
    }
}

impl IndicatorCalculator for Ichimoku {
    type Output = IchimokuPoint;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "conversion": self.conversion,
            "base": self.base,
            "span_b": self.span_b,
            "displacement": self.displacement,
        })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<IchimokuPoint> {
        let highs: Vec<f64> = data.iter().map(|c| c.high).collect();
        let lows: Vec<f64> = data.iter().map(|c| c.low).collect();
        let conversion = Self::midpoints(&highs, &lows, self.conversion);
        let base = Self::midpoints(&highs, &lows, self.base);
        let span_b = Self::midpoints(&highs, &lows, self.span_b);

        (0..data.len())
            .map(|i| {
                let source = i.checked_sub(self.displacement);
                IchimokuPoint {
                    conversion: conversion[i],
                    base: base[i],
                    span_a: source.and_then(|s| Some((conversion[s]? + base[s]?) / 2.0)),
                    span_b: source.and_then(|s| span_b[s]),
                }
            })
            .collect()
    }
}
