// Per-asset alert state: one-shot price alerts and volume surge tracking.
use serde::Serialize;
use shared::models::AlertDirection;

/// Pending price alerts for one asset, in registration order.
///
/// Mutated only through `register` and `check`. An entry is removed by the
/// same `check` call that fires it, so each registration fires at most once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertRegistry {
    entries: Vec<PriceAlert>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceAlert {
    pub target: f64,
    pub direction: AlertDirection,
}

impl AlertRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an alert, or replaces the direction of an existing alert at the
    /// same target without moving it.
    pub fn register(&mut self, target: f64, direction: AlertDirection) {
        match self.entries.iter_mut().find(|a| a.target == target) {
            Some(existing) => existing.direction = direction,
            None => self.entries.push(PriceAlert { target, direction }),
        }
    }

    /// Returns the alerts `price` has crossed, in registration order, and
    /// removes them.
    pub fn check(&mut self, price: f64) -> Vec<PriceAlert> {
        let fired: Vec<PriceAlert> = self
            .entries
            .iter()
            .filter(|a| a.direction.is_crossed(a.target, price))
            .copied()
            .collect();
        if !fired.is_empty() {
            self.entries.retain(|a| !fired.contains(a));
        }
        fired
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumeCheck {
    pub surged: bool,
    /// Latest volume over the previous one; `None` on the first observation
    /// or when both volumes are zero. Infinite after a zero-volume candle.
    pub ratio: Option<f64>,
}

/// Last observed latest-candle volume for one asset.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeState {
    threshold: f64,
    previous: Option<f64>,
}

impl VolumeState {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            previous: None,
        }
    }

    pub fn previous(&self) -> Option<f64> {
        self.previous
    }

    /// Compares `volume` with the stored volume, then stores `volume`
    /// whatever the outcome.
    pub fn check_volume_surge(&mut self, volume: f64) -> VolumeCheck {
        let ratio = self
            .previous
            .map(|prev| volume / prev)
            .filter(|ratio| !ratio.is_nan());
        self.previous = Some(volume);
        VolumeCheck {
            surged: ratio.map_or(false, |r| r > self.threshold),
            ratio,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertKind {
    PriceCrossed {
        target: f64,
        direction: AlertDirection,
        price: f64,
    },
    VolumeSurge {
        ratio: f64,
        volume: f64,
    },
    /// The score rose to the crossing threshold from below it.
    SignalCrossed {
        score: i32,
        previous: Option<i32>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEvent {
    pub asset: String,
    #[serde(flatten)]
    pub kind: AlertKind,
}

/// Receives alert events as they happen. Rendering is up to the sink.
pub trait AlertSink: Send + Sync {
    fn publish(&self, event: &AlertEvent);
}

/// Default sink: one structured log line per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AlertSink for TracingSink {
    fn publish(&self, event: &AlertEvent) {
        match &event.kind {
            AlertKind::PriceCrossed { target, direction, price } => {
                tracing::warn!(asset = %event.asset, target_price = *target, %direction, price, "Price alert triggered");
            }
            AlertKind::VolumeSurge { ratio, volume } => {
                tracing::warn!(asset = %event.asset, ratio, volume, "Volume surge detected");
            }
            AlertKind::SignalCrossed { score, previous } => {
                tracing::info!(asset = %event.asset, score, previous = ?previous, "Buy signal threshold reached");
            }
        }
    }
}
