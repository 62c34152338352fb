//! Integration tests for statistics persisted through the SQLite store.

use std::rc::Rc;

use chrono::{TimeZone, Utc};
use pomotimer_core::storage::{self, STATS_KEY};
use pomotimer_core::timer::ManualClock;
use pomotimer_core::{Database, IntervalType, KeyValueStore, StatsAggregator, StatsSnapshot};

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2024, 11, 4, 15, 0, 0).unwrap())
}

#[test]
fn test_snapshot_survives_reopening_the_database() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("pomotimer.db");

    let saved = {
        let db = Database::open_at(&path).unwrap();
        let mut stats = StatsAggregator::new(db, clock());
        stats.record_completion(1500, IntervalType::Focus);
        stats.record_completion(1500, IntervalType::ShortBreak);
        stats.record_completion(3000, IntervalType::Focus);
        stats.get_stats()
    };

    let db = Database::open_at(&path).unwrap();
    let reloaded = StatsAggregator::new(db, clock());
    assert_eq!(reloaded.get_stats(), saved);
    assert_eq!(saved.completed_focus_intervals, 2);
    assert_eq!(saved.total_focus_minutes, 75);
}

#[test]
fn test_store_shared_between_aggregator_and_host() {
    let db = Rc::new(Database::open_memory().unwrap());
    let mut stats = StatsAggregator::new(Rc::clone(&db), clock());
    stats.record_completion(1500, IntervalType::Focus);

    let raw: StatsSnapshot = storage::load(&*db, STATS_KEY, StatsSnapshot::default());
    assert_eq!(raw, stats.get_stats());
}

#[test]
fn test_corrupt_record_starts_from_zero() {
    let db = Database::open_memory().unwrap();
    db.set(STATS_KEY, "{\"completed_focus_intervals\": \"many\"}").unwrap();

    let mut stats = StatsAggregator::new(&db, clock());
    assert_eq!(stats.get_stats(), StatsSnapshot::default());

    stats.record_completion(1500, IntervalType::Focus);
    let reloaded = StatsAggregator::new(&db, clock());
    assert_eq!(reloaded.get_stats().completed_focus_intervals, 1);
}

#[test]
fn test_reset_is_persisted() {
    let db = Database::open_memory().unwrap();
    let mut stats = StatsAggregator::new(&db, clock());
    stats.record_completion(1500, IntervalType::Focus);
    stats.reset_stats();

    let reloaded = StatsAggregator::new(&db, clock());
    let snapshot = reloaded.get_stats();
    assert_eq!(snapshot.completed_focus_intervals, 0);
    assert_eq!(snapshot.total_focus_minutes, 0);
    assert!(snapshot.daily_stats.is_empty());
}
