// Scoring rules. Each rule looks at the latest indicator row (and the row
// before it for trend deltas) and contributes at most one observation.
use crate::indicators::IndicatorRow;

/// One triggered rule: the score delta and the observation it reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contribution {
    pub delta: i32,
    pub observation: &'static str,
}

impl Contribution {
    const fn new(delta: i32, observation: &'static str) -> Self {
        Self { delta, observation }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub row: &'a IndicatorRow,
    pub previous: &'a IndicatorRow,
    pub price: f64,
}

pub type Rule = fn(&RuleInput<'_>) -> Option<Contribution>;

/// Ten-rule set, in evaluation order.
pub const FULL_RULES: [Rule; 10] = [
    rsi,
    macd,
    ma_alignment,
    bollinger,
    stochastic,
    dmi,
    obv,
    ichimoku,
    roc,
    channel,
];

/// Three-rule set used by the light profile.
pub const LIGHT_RULES: [Rule; 3] = [light_rsi, light_macd, light_ma];

pub fn rsi(input: &RuleInput<'_>) -> Option<Contribution> {
    let rsi = input.row.rsi?;
    if rsi < 30.0 {
        Some(Contribution::new(1, "RSI oversold (buy signal)"))
    } else if rsi > 70.0 {
        Some(Contribution::new(-1, "RSI overbought (sell signal)"))
    } else {
        None
    }
}

/// Always reports the MACD trend; only a strengthening histogram scores.
pub fn macd(input: &RuleInput<'_>) -> Option<Contribution> {
    let row = input.row;
    let (line, signal) = (row.macd?, row.macd_signal?);
    let (hist, prev_hist) = (row.macd_hist?, input.previous.macd_hist?);
    let contribution = if line > signal {
        if hist > prev_hist {
            Contribution::new(1, "MACD uptrend strengthening")
        } else {
            Contribution::new(0, "MACD uptrend")
        }
    } else if hist < prev_hist {
        Contribution::new(-1, "MACD downtrend strengthening")
    } else {
        Contribution::new(0, "MACD downtrend")
    };
    Some(contribution)
}

pub fn ma_alignment(input: &RuleInput<'_>) -> Option<Contribution> {
    let row = input.row;
    let (ma5, ma20, ma60) = (row.ma5?, row.ma20?, row.ma60?);
    if ma5 > ma20 && ma20 > ma60 {
        Some(Contribution::new(1, "Moving averages in bullish alignment (golden cross)"))
    } else if ma5 < ma20 && ma20 < ma60 {
        Some(Contribution::new(-1, "Moving averages in bearish alignment (dead cross)"))
    } else {
        None
    }
}

pub fn bollinger(input: &RuleInput<'_>) -> Option<Contribution> {
    let (upper, lower) = (input.row.bb_upper?, input.row.bb_lower?);
    if input.price < lower {
        Some(Contribution::new(1, "Price below the lower Bollinger band (buy signal)"))
    } else if input.price > upper {
        Some(Contribution::new(-1, "Price above the upper Bollinger band (sell signal)"))
    } else {
        None
    }
}

pub fn stochastic(input: &RuleInput<'_>) -> Option<Contribution> {
    let (k, d) = (input.row.stoch_k?, input.row.stoch_d?);
    if k < 20.0 && k > d {
        Some(Contribution::new(1, "Stochastic oversold rebound"))
    } else if k > 80.0 && k < d {
        Some(Contribution::new(-1, "Stochastic overbought pullback"))
    } else {
        None
    }
}

/// Only a trending market (ADX above 25) scores.
pub fn dmi(input: &RuleInput<'_>) -> Option<Contribution> {
    let row = input.row;
    let (adx, plus, minus) = (row.adx?, row.plus_di?, row.minus_di?);
    if adx <= 25.0 {
        return None;
    }
    if plus > minus {
        Some(Contribution::new(1, "DMI strong uptrend"))
    } else if minus > plus {
        Some(Contribution::new(-1, "DMI strong downtrend"))
    } else {
        None
    }
}

pub fn obv(input: &RuleInput<'_>) -> Option<Contribution> {
    let (obv, obv_ma) = (input.row.obv?, input.row.obv_ma?);
    if obv > obv_ma {
        Some(Contribution::new(1, "OBV above its average (buying pressure)"))
    } else if obv < obv_ma {
        Some(Contribution::new(-1, "OBV below its average (selling pressure)"))
    } else {
        None
    }
}

/// Compares the row's close, not the live price, against the cloud.
pub fn ichimoku(input: &RuleInput<'_>) -> Option<Contribution> {
    let row = input.row;
    let (span_a, span_b) = (row.ichimoku_span_a?, row.ichimoku_span_b?);
    if row.close > span_a && row.close > span_b {
        Some(Contribution::new(1, "Ichimoku bullish (close above the cloud)"))
    } else if row.close < span_a && row.close < span_b {
        Some(Contribution::new(-1, "Ichimoku bearish (close below the cloud)"))
    } else {
        None
    }
}

pub fn roc(input: &RuleInput<'_>) -> Option<Contribution> {
    let roc = input.row.roc?;
    if roc > 5.0 {
        Some(Contribution::new(1, "ROC strong upward momentum"))
    } else if roc < -5.0 {
        Some(Contribution::new(-1, "ROC strong downward momentum"))
    } else {
        None
    }
}

pub fn channel(input: &RuleInput<'_>) -> Option<Contribution> {
    let (high, low) = (input.row.channel_high?, input.row.channel_low?);
    if input.price >= high {
        Some(Contribution::new(1, "Upper channel breakout (trend continuation)"))
    } else if input.price <= low {
        Some(Contribution::new(-1, "Lower channel breakdown (trend continuation)"))
    } else {
        None
    }
}

pub fn light_rsi(input: &RuleInput<'_>) -> Option<Contribution> {
    let rsi = input.row.rsi?;
    if rsi < 30.0 {
        Some(Contribution::new(2, "RSI oversold"))
    } else if rsi > 70.0 {
        Some(Contribution::new(-2, "RSI overbought"))
    } else {
        None
    }
}

pub fn light_macd(input: &RuleInput<'_>) -> Option<Contribution> {
    if input.row.macd? > input.row.macd_signal? {
        Some(Contribution::new(1, "MACD rising"))
    } else {
        Some(Contribution::new(-1, "MACD falling"))
    }
}

pub fn light_ma(input: &RuleInput<'_>) -> Option<Contribution> {
    if input.row.ma5? > input.row.ma20? {
        Some(Contribution::new(1, "Short-term uptrend"))
    } else {
        Some(Contribution::new(-1, "Short-term downtrend"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(row: &'a IndicatorRow, previous: &'a IndicatorRow, price: f64) -> RuleInput<'a> {
        RuleInput { row, previous, price }
    }

    #[test]
    fn test_rsi_thresholds_are_strict() {
        let prev = IndicatorRow::default();
        let at = |v: f64| IndicatorRow { rsi: Some(v), ..Default::default() };
        assert_eq!(rsi(&input(&at(29.9), &prev, 0.0)).map(|c| c.delta), Some(1));
        assert_eq!(rsi(&input(&at(30.0), &prev, 0.0)), None);
        assert_eq!(rsi(&input(&at(70.0), &prev, 0.0)), None);
        assert_eq!(rsi(&input(&at(70.1), &prev, 0.0)).map(|c| c.delta), Some(-1));
    }

    #[test]
    fn test_macd_always_reports_a_trend() {
        let prev = IndicatorRow { macd_hist: Some(0.5), ..Default::default() };
        let row = |line: f64, signal: f64| IndicatorRow {
            macd: Some(line),
            macd_signal: Some(signal),
            macd_hist: Some(line - signal),
            ..Default::default()
        };
        let up_strong = macd(&input(&row(2.0, 1.0), &prev, 0.0)).unwrap();
        assert_eq!((up_strong.delta, up_strong.observation), (1, "MACD uptrend strengthening"));
        let up_weak = macd(&input(&row(1.2, 1.0), &prev, 0.0)).unwrap();
        assert_eq!((up_weak.delta, up_weak.observation), (0, "MACD uptrend"));
        // Equal line and signal take the bearish branch.
        let flat = macd(&input(&row(1.0, 1.0), &prev, 0.0)).unwrap();
        assert_eq!((flat.delta, flat.observation), (-1, "MACD downtrend strengthening"));
        let prev_low = IndicatorRow { macd_hist: Some(-3.0), ..Default::default() };
        let down_weak = macd(&input(&row(0.0, 1.0), &prev_low, 0.0)).unwrap();
        assert_eq!((down_weak.delta, down_weak.observation), (0, "MACD downtrend"));
    }

    #[test]
    fn test_dmi_needs_trend_strength() {
        let prev = IndicatorRow::default();
        let row = |adx: f64| IndicatorRow {
            adx: Some(adx),
            plus_di: Some(30.0),
            minus_di: Some(10.0),
            ..Default::default()
        };
        assert_eq!(dmi(&input(&row(25.0), &prev, 0.0)), None);
        assert_eq!(dmi(&input(&row(25.5), &prev, 0.0)).map(|c| c.delta), Some(1));
    }

    #[test]
    fn test_channel_is_inclusive_and_uses_live_price() {
        let prev = IndicatorRow::default();
        let row = IndicatorRow {
            close: 50.0,
            channel_high: Some(110.0),
            channel_low: Some(90.0),
            ..Default::default()
        };
        assert_eq!(channel(&input(&row, &prev, 110.0)).map(|c| c.delta), Some(1));
        assert_eq!(channel(&input(&row, &prev, 90.0)).map(|c| c.delta), Some(-1));
        assert_eq!(channel(&input(&row, &prev, 100.0)), None);
    }

    #[test]
    fn test_ichimoku_mixed_cloud_is_silent() {
        let prev = IndicatorRow::default();
        let row = IndicatorRow {
            close: 100.0,
            ichimoku_span_a: Some(90.0),
            ichimoku_span_b: Some(110.0),
            ..Default::default()
        };
        assert_eq!(ichimoku(&input(&row, &prev, 200.0)), None);
    }

    #[test]
    fn test_ma_alignment_needs_full_ordering() {
        let prev = IndicatorRow::default();
        let row = |ma5: f64, ma20: f64, ma60: f64| IndicatorRow {
            ma5: Some(ma5),
            ma20: Some(ma20),
            ma60: Some(ma60),
            ..Default::default()
        };
        let bullish = ma_alignment(&input(&row(110.0, 105.0, 100.0), &prev, 0.0)).unwrap();
        assert_eq!(
            (bullish.delta, bullish.observation),
            (1, "Moving averages in bullish alignment (golden cross)")
        );
        assert_eq!(ma_alignment(&input(&row(90.0, 95.0, 100.0), &prev, 0.0)).map(|c| c.delta), Some(-1));
        assert_eq!(ma_alignment(&input(&row(110.0, 95.0, 100.0), &prev, 0.0)), None);
        assert_eq!(ma_alignment(&input(&row(100.0, 100.0, 90.0), &prev, 0.0)), None);
    }

    #[test]
    fn test_bollinger_uses_live_price_strictly() {
        let prev = IndicatorRow::default();
        let row = IndicatorRow {
            close: 100.0,
            bb_upper: Some(105.0),
            bb_lower: Some(95.0),
            ..Default::default()
        };
        let below = bollinger(&input(&row, &prev, 94.0)).unwrap();
        assert_eq!((below.delta, below.observation), (1, "Price below the lower Bollinger band (buy signal)"));
        let above = bollinger(&input(&row, &prev, 106.0)).unwrap();
        assert_eq!((above.delta, above.observation), (-1, "Price above the upper Bollinger band (sell signal)"));
        assert_eq!(bollinger(&input(&row, &prev, 95.0)), None);
        assert_eq!(bollinger(&input(&row, &prev, 105.0)), None);
    }

    #[test]
    fn test_stochastic_needs_zone_and_cross() {
        let prev = IndicatorRow::default();
        let row = |k: f64, d: f64| IndicatorRow {
            stoch_k: Some(k),
            stoch_d: Some(d),
            ..Default::default()
        };
        assert_eq!(stochastic(&input(&row(15.0, 10.0), &prev, 0.0)).map(|c| c.delta), Some(1));
        let overbought = stochastic(&input(&row(85.0, 90.0), &prev, 0.0)).unwrap();
        assert_eq!((overbought.delta, overbought.observation), (-1, "Stochastic overbought pullback"));
        // In the zone but moving the wrong way.
        assert_eq!(stochastic(&input(&row(15.0, 18.0), &prev, 0.0)), None);
        assert_eq!(stochastic(&input(&row(85.0, 80.0), &prev, 0.0)), None);
        assert_eq!(stochastic(&input(&row(20.0, 10.0), &prev, 0.0)), None);
        assert_eq!(stochastic(&input(&row(80.0, 90.0), &prev, 0.0)), None);
    }

    #[test]
    fn test_dmi_direction_follows_dominant_line() {
        let prev = IndicatorRow::default();
        let row = |plus: f64, minus: f64| IndicatorRow {
            adx: Some(40.0),
            plus_di: Some(plus),
            minus_di: Some(minus),
            ..Default::default()
        };
        assert_eq!(dmi(&input(&row(10.0, 30.0), &prev, 0.0)).map(|c| c.delta), Some(-1));
        assert_eq!(dmi(&input(&row(20.0, 20.0), &prev, 0.0)), None);
    }

    #[test]
    fn test_obv_against_its_average() {
        let prev = IndicatorRow::default();
        let row = |obv_value: f64| IndicatorRow {
            obv: Some(obv_value),
            obv_ma: Some(1000.0),
            ..Default::default()
        };
        let above = obv(&input(&row(1200.0), &prev, 0.0)).unwrap();
        assert_eq!((above.delta, above.observation), (1, "OBV above its average (buying pressure)"));
        assert_eq!(obv(&input(&row(800.0), &prev, 0.0)).map(|c| c.delta), Some(-1));
        assert_eq!(obv(&input(&row(1000.0), &prev, 0.0)), None);
    }

    #[test]
    fn test_ichimoku_uses_row_close() {
        let prev = IndicatorRow::default();
        let row = |close: f64| IndicatorRow {
            close,
            ichimoku_span_a: Some(90.0),
            ichimoku_span_b: Some(110.0),
            ..Default::default()
        };
        assert_eq!(ichimoku(&input(&row(120.0), &prev, 50.0)).map(|c| c.delta), Some(1));
        assert_eq!(ichimoku(&input(&row(80.0), &prev, 150.0)).map(|c| c.delta), Some(-1));
        // Touching a span is not outside the cloud.
        assert_eq!(ichimoku(&input(&row(110.0), &prev, 0.0)), None);
    }

    #[test]
    fn test_roc_thresholds_are_strict() {
        let prev = IndicatorRow::default();
        let at = |v: f64| IndicatorRow { roc: Some(v), ..Default::default() };
        let up = roc(&input(&at(5.1), &prev, 0.0)).unwrap();
        assert_eq!((up.delta, up.observation), (1, "ROC strong upward momentum"));
        assert_eq!(roc(&input(&at(5.0), &prev, 0.0)), None);
        assert_eq!(roc(&input(&at(-5.0), &prev, 0.0)), None);
        assert_eq!(roc(&input(&at(-5.1), &prev, 0.0)).map(|c| c.delta), Some(-1));
    }

    #[test]
    fn test_missing_input_silences_rule() {
        let prev = IndicatorRow::default();
        let row = IndicatorRow {
            bb_upper: Some(105.0),
            stoch_k: Some(10.0),
            roc: None,
            ..Default::default()
        };
        for rule in [bollinger as Rule, stochastic, roc, channel] {
            assert_eq!(rule(&input(&row, &prev, 1.0)), None);
        }
    }

    #[test]
    fn test_light_rules_always_report_trend() {
        let prev = IndicatorRow::default();
        let row = IndicatorRow {
            rsi: Some(20.0),
            macd: Some(1.0),
            macd_signal: Some(1.0),
            ma5: Some(10.0),
            ma20: Some(9.0),
            ..Default::default()
        };
        let deltas: Vec<i32> = LIGHT_RULES
            .iter()
            .filter_map(|rule| rule(&input(&row, &prev, 0.0)))
            .map(|c| c.delta)
            .collect();
        assert_eq!(deltas, vec![2, -1, 1]);
    }
}
