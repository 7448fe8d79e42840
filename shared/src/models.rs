use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
    }

    /// Traded value of the candle (close × volume), used for ranking.
    pub fn traded_value(&self) -> f64 {
        self.close * self.volume
    }
}

/// Candle interval, named the way the exchange API names them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeFrame {
    #[serde(rename = "minute1")]
    Minute1,
    #[serde(rename = "minute3")]
    Minute3,
    #[serde(rename = "minute5")]
    Minute5,
    #[serde(rename = "minute10")]
    Minute10,
    #[serde(rename = "minute15")]
    Minute15,
    #[serde(rename = "minute30")]
    Minute30,
    #[serde(rename = "minute60")]
    Minute60,
    #[serde(rename = "minute240")]
    Minute240,
    #[serde(rename = "day")]
    Day,
    #[serde(rename = "week")]
    Week,
    #[serde(rename = "month")]
    Month,
}

impl TimeFrame {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::Minute1 => "minute1",
            TimeFrame::Minute3 => "minute3",
            TimeFrame::Minute5 => "minute5",
            TimeFrame::Minute10 => "minute10",
            TimeFrame::Minute15 => "minute15",
            TimeFrame::Minute30 => "minute30",
            TimeFrame::Minute60 => "minute60",
            TimeFrame::Minute240 => "minute240",
            TimeFrame::Day => "day",
            TimeFrame::Week => "week",
            TimeFrame::Month => "month",
        }
    }

    /// Minute unit for intraday intervals, `None` for day and longer.
    pub fn minutes(&self) -> Option<u32> {
        match self {
            TimeFrame::Minute1 => Some(1),
            TimeFrame::Minute3 => Some(3),
            TimeFrame::Minute5 => Some(5),
            TimeFrame::Minute10 => Some(10),
            TimeFrame::Minute15 => Some(15),
            TimeFrame::Minute30 => Some(30),
            TimeFrame::Minute60 => Some(60),
            TimeFrame::Minute240 => Some(240),
            TimeFrame::Day | TimeFrame::Week | TimeFrame::Month => None,
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered candle history for one asset at one interval.
///
/// Candles are kept ascending by timestamp with no duplicate timestamps. Gaps
/// between candles are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    asset: String,
    interval: TimeFrame,
    candles: Vec<Candle>,
}

impl Series {
    /// Builds a series from candles in any order. Candles are sorted by
    /// timestamp and later duplicates of a timestamp are dropped.
    pub fn new(asset: impl Into<String>, interval: TimeFrame, mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.timestamp);
        candles.dedup_by_key(|c| c.timestamp);
        Self {
            asset: asset.into(),
            interval,
            candles,
        }
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn interval(&self) -> TimeFrame {
        self.interval
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn latest(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Keeps only the most recent `count` candles.
    pub fn truncate_front(mut self, count: usize) -> Self {
        if self.candles.len() > count {
            let excess = self.candles.len() - count;
            self.candles.drain(..excess);
        }
        self
    }
}

/// Which side of a target price triggers a price alert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    Above,
    Below,
}

impl AlertDirection {
    /// Strict comparison: a price equal to the target never triggers.
    pub fn is_crossed(&self, target: f64, price: f64) -> bool {
        match self {
            AlertDirection::Above => price > target,
            AlertDirection::Below => price < target,
        }
    }
}

impl fmt::Display for AlertDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertDirection::Above => f.write_str("above"),
            AlertDirection::Below => f.write_str("below"),
        }
    }
}
