use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};

use super::records::{DailyStatRecord, StatsSnapshot};
use crate::storage::{self, KeyValueStore, STATS_KEY};
use crate::timer::{Clock, IntervalType};

/// Accumulates focus completions and keeps them persisted.
///
/// The snapshot is loaded from `store` once at construction and written back
/// after every change. Storage failures are logged and otherwise ignored:
/// the in-memory counters stay authoritative for the life of the aggregator.
pub struct StatsAggregator<S> {
    store: S,
    clock: Box<dyn Clock>,
    stats: StatsSnapshot,
}

impl<S: KeyValueStore> StatsAggregator<S> {
    pub fn new(store: S, clock: impl Clock + 'static) -> Self {
        let stats = storage::load(&store, STATS_KEY, StatsSnapshot::default());
        Self {
            store,
            clock: Box::new(clock),
            stats,
        }
    }

    /// Count one completed interval of `focus_secs` seconds.
    ///
    /// Only focus intervals are counted; breaks are ignored. Minutes are
    /// whole minutes, rounded down. Returns whether anything was recorded.
    pub fn record_completion(&mut self, focus_secs: u64, interval: IntervalType) -> bool {
        if interval != IntervalType::Focus {
            return false;
        }
        let minutes = focus_secs / 60;
        let today = self.clock.today();
        self.stats.add_focus(today, minutes);
        tracing::debug!(%today, minutes, total = self.stats.completed_focus_intervals, "focus interval recorded");
        self.persist();
        true
    }

    pub fn get_stats(&self) -> StatsSnapshot {
        self.stats.clone()
    }

    pub fn get_daily_stats(&self, day: NaiveDate) -> Option<DailyStatRecord> {
        self.stats.daily_stats.get(&day).cloned()
    }

    /// Today's record, zeroed when nothing was recorded yet.
    pub fn get_today_stats(&self) -> DailyStatRecord {
        let today = self.clock.today();
        self.get_daily_stats(today)
            .unwrap_or_else(|| DailyStatRecord::empty(today))
    }

    /// One record for each of the last `days` calendar days, today included.
    ///
    /// Every day is keyed by its own date; days without activity get a
    /// zeroed record.
    pub fn get_recent_stats(&self, days: u32) -> BTreeMap<NaiveDate, DailyStatRecord> {
        let today = self.clock.today();
        (0..u64::from(days))
            .map_while(|offset| today.checked_sub_days(Days::new(offset)))
            .map(|day| {
                let record = self
                    .get_daily_stats(day)
                    .unwrap_or_else(|| DailyStatRecord::empty(day));
                (day, record)
            })
            .collect()
    }

    pub fn reset_stats(&mut self) {
        self.stats = StatsSnapshot::default();
        tracing::debug!("statistics reset");
        self.persist();
    }

    fn persist(&self) {
        // `save` already logs the reason.
        let _ = storage::save(&self.store, STATS_KEY, &self.stats);
    }
}
