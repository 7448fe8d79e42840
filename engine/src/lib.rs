// Signal engine library: market data acquisition, indicators, scoring and
// per-asset alert state.

pub mod alerts;
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod monitor;
pub mod ranker;
pub mod retry;
pub mod signals;
pub mod watcher;

pub use error::{EngineError, Result};
