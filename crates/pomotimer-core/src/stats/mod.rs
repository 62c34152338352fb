//! Statistics module for Pomotimer
//!
//! Accumulates completed focus intervals and focus minutes, globally and per
//! calendar day, from the completion events a host forwards to it.

mod aggregator;
mod records;

pub use aggregator::StatsAggregator;
pub use records::{DailyStatRecord, StatsSnapshot};
