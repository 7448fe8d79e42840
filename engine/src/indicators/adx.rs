/// ADX / DMI with Wilder smoothing.
///
/// 1. +DM, −DM and true range from consecutive candles.
/// 2. The first smoothed values are plain sums over `period` bars, after which
///    `S = S − S / period + x`.
/// 3. +DI = 100 × S(+DM) / S(TR), −DI likewise, DX = 100 × |+DI − −DI| / (+DI + −DI).
/// 4. ADX starts as the mean of the first `period` DX values, then Wilder-smoothed.
///
/// +DI/−DI are defined from index `period`, ADX from index `2 × period − 1`.
use super::IndicatorCalculator;
use serde::Serialize;
use serde_json::Value;
use shared::models::Candle;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AdxPoint {
    pub adx: Option<f64>,
    pub plus_di: Option<f64>,
    pub minus_di: Option<f64>,
}

pub struct Adx {
    name: String,
    period: usize,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("ADX({})", period),
            period,
        }
    }

    fn directional(current: &Candle, previous: &Candle) -> (f64, f64, f64) {
        let up = current.high - previous.high;
        let down = previous.low - current.low;
        let plus_dm = if up > down && up > 0.0 { up } else { 0.0 };
        let minus_dm = if down > up && down > 0.0 { down } else { 0.0 };
        let tr = (current.high - current.low)
            .max((current.high - previous.close).abs())
            .max((current.low - previous.close).abs());
        (plus_dm, minus_dm, tr)
    }

    fn di_dx(s_plus: f64, s_minus: f64, s_tr: f64) -> (f64, f64, f64) {
        if s_tr == 0.0 {
            return (0.0, 0.0, 0.0);
        }
        let plus_di = 100.0 * s_plus / s_tr;
        let minus_di = 100.0 * s_minus / s_tr;
        let di_sum = plus_di + minus_di;
        let dx = if di_sum == 0.0 {
            0.0
        } else {
            100.0 * (plus_di - minus_di).abs() / di_sum
        };
        (plus_di, minus_di, dx)
    }
}

impl Default for Adx {
    fn default() -> Self {
        Adx::new(14)
    }
}

impl IndicatorCalculator for Adx {
    type Output = AdxPoint;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<AdxPoint> {
        let mut results = vec![AdxPoint::default(); data.len()];
        let period = self.period;
        if period == 0 || data.len() <= period {
            return results;
        }

        let (mut s_plus, mut s_minus, mut s_tr) = (0.0, 0.0, 0.0);
        for i in 1..=period {
            let (p, m, tr) = Self::directional(&data[i], &data[i - 1]);
            s_plus += p;
            s_minus += m;
            s_tr += tr;
        }

        let mut dx_seed = Vec::with_capacity(period);
        let mut adx: Option<f64> = None;

        for i in period..data.len() {
            if i > period {
                let (p, m, tr) = Self::directional(&data[i], &data[i - 1]);
                s_plus = s_plus - s_plus / period as f64 + p;
                s_minus = s_minus - s_minus / period as f64 + m;
                s_tr = s_tr - s_tr / period as f64 + tr;
            }
            let (plus_di, minus_di, dx) = Self::di_dx(s_plus, s_minus, s_tr);

            adx = match adx {
                Some(prev) => Some((prev * (period - 1) as f64 + dx) / period as f64),
                None => {
                    dx_seed.push(dx);
                    if dx_seed.len() == period {
                        Some(dx_seed.iter().sum::<f64>() / period as f64)
                    } else {
                        None
                    }
                }
            };

            results[i] = AdxPoint {
                adx,
                plus_di: Some(plus_di),
                minus_di: Some(minus_di),
            };
        }
        results
    }
}
