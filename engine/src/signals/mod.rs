// Signal aggregation: turns the latest indicator rows into a score plus
// the observations that produced it.
pub mod rules;

pub use rules::{Contribution, Rule, RuleInput, FULL_RULES, LIGHT_RULES};

use serde::Serialize;

use crate::indicators::{IndicatorProfile, IndicatorRow};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalResult {
    pub asset: String,
    pub current_price: f64,
    /// Observations of the triggered rules, in rule order.
    pub observations: Vec<String>,
    /// Signed sum of the rule contributions.
    pub score: i32,
    /// The row the score was computed from.
    pub snapshot: IndicatorRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalAggregator {
    profile: IndicatorProfile,
}

impl SignalAggregator {
    pub fn new(profile: IndicatorProfile) -> Self {
        Self { profile }
    }

    pub fn rules(&self) -> &'static [Rule] {
        match self.profile {
            IndicatorProfile::Full => &FULL_RULES,
            IndicatorProfile::Light => &LIGHT_RULES,
        }
    }

    /// Scores `row` against the active rule set.
    ///
    /// Returns `None` without a usable current price, or when either row is
    /// missing a value the rules read. Every rule runs; none short-circuits.
    pub fn evaluate(
        &self,
        asset: &str,
        row: &IndicatorRow,
        previous: &IndicatorRow,
        current_price: Option<f64>,
    ) -> Option<SignalResult> {
        let price = current_price.filter(|p| p.is_finite())?;
        if !self.is_eligible(row, previous) {
            tracing::debug!(asset, "Latest indicator row is not ready for evaluation");
            return None;
        }

        let input = RuleInput { row, previous, price };
        let mut score = 0;
        let mut observations = Vec::new();
        for rule in self.rules() {
            if let Some(contribution) = rule(&input) {
                score += contribution.delta;
                observations.push(contribution.observation.to_string());
            }
        }

        Some(SignalResult {
            asset: asset.to_string(),
            current_price: price,
            observations,
            score,
            snapshot: *row,
        })
    }

    /// Evaluates the last row of `rows`, using the one before it for trend
    /// deltas.
    pub fn evaluate_latest(
        &self,
        asset: &str,
        rows: &[IndicatorRow],
        current_price: Option<f64>,
    ) -> Option<SignalResult> {
        match rows {
            [.., previous, row] => self.evaluate(asset, row, previous, current_price),
            _ => None,
        }
    }

    fn is_eligible(&self, row: &IndicatorRow, previous: &IndicatorRow) -> bool {
        let light = [row.rsi, row.macd, row.macd_signal, row.ma5, row.ma20];
        if light.iter().any(Option::is_none) {
            return false;
        }
        match self.profile {
            IndicatorProfile::Light => true,
            IndicatorProfile::Full => [
                row.macd_hist,
                previous.macd_hist,
                row.ma60,
                row.bb_upper,
                row.bb_lower,
                row.stoch_k,
                row.stoch_d,
                row.adx,
                row.plus_di,
                row.minus_di,
                row.obv,
                row.obv_ma,
                row.ichimoku_span_a,
                row.ichimoku_span_b,
                row.roc,
                row.channel_high,
                row.channel_low,
            ]
            .iter()
            .all(Option::is_some),
        }
    }
}
