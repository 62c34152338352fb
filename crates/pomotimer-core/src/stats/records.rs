use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Focus activity for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStatRecord {
    pub date: NaiveDate,
    pub completed_focus_intervals: u64,
    pub total_focus_minutes: u64,
}

impl DailyStatRecord {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            completed_focus_intervals: 0,
            total_focus_minutes: 0,
        }
    }
}

/// Everything the aggregator knows. Serialized as the `stats` record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub completed_focus_intervals: u64,
    #[serde(default)]
    pub total_focus_minutes: u64,
    /// Keyed by `YYYY-MM-DD`.
    #[serde(default)]
    pub daily_stats: BTreeMap<NaiveDate, DailyStatRecord>,
}

impl StatsSnapshot {
    /// Add one focus interval of `minutes` to the totals and to `day`.
    pub(crate) fn add_focus(&mut self, day: NaiveDate, minutes: u64) {
        self.completed_focus_intervals = self.completed_focus_intervals.saturating_add(1);
        self.total_focus_minutes = self.total_focus_minutes.saturating_add(minutes);

        let record = self
            .daily_stats
            .entry(day)
            .or_insert_with(|| DailyStatRecord::empty(day));
        record.completed_focus_intervals = record.completed_focus_intervals.saturating_add(1);
        record.total_focus_minutes = record.total_focus_minutes.saturating_add(minutes);
    }
}
