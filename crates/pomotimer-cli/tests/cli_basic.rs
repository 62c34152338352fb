//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

mod common;

use common::{parse_json, run_cli_failure, run_cli_success};
use tempfile::TempDir;

#[test]
fn test_timer_status_defaults_to_idle_focus() {
    let dir = TempDir::new().unwrap();
    let state = parse_json(&run_cli_success(dir.path(), &["timer", "status"]));
    assert_eq!(state["status"], "idle");
    assert_eq!(state["type"], "focus");
    assert_eq!(state["total_secs"], 1500);
    assert_eq!(state["remaining_secs"], 1500);
    assert_eq!(state["session_count"], 0);
}

#[test]
fn test_timer_skip_moves_to_short_break_and_persists() {
    let dir = TempDir::new().unwrap();
    let skipped = parse_json(&run_cli_success(dir.path(), &["timer", "skip"]));
    assert_eq!(skipped["type"], "short_break");
    assert_eq!(skipped["session_count"], 1);
    assert_eq!(skipped["total_secs"], 300);

    let state = parse_json(&run_cli_success(dir.path(), &["timer", "status"]));
    assert_eq!(state, skipped);
}

#[test]
fn test_timer_skip_uses_configured_lengths() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["config", "set", "schedule.short_break", "10"]);
    let skipped = parse_json(&run_cli_success(dir.path(), &["timer", "skip"]));
    assert_eq!(skipped["total_secs"], 600);
}

#[test]
fn test_timer_reset_keeps_interval() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["timer", "skip"]);
    let state = parse_json(&run_cli_success(dir.path(), &["timer", "reset"]));
    assert_eq!(state["type"], "short_break");
    assert_eq!(state["status"], "idle");
    assert_eq!(state["remaining_secs"], state["total_secs"]);
}

#[test]
fn test_stats_start_empty() {
    let dir = TempDir::new().unwrap();
    let all = parse_json(&run_cli_success(dir.path(), &["stats", "all"]));
    assert_eq!(all["completed_focus_intervals"], 0);
    assert_eq!(all["total_focus_minutes"], 0);

    let today = parse_json(&run_cli_success(dir.path(), &["stats", "today"]));
    assert_eq!(today["completed_focus_intervals"], 0);
}

#[test]
fn test_stats_recent_has_one_record_per_day() {
    let dir = TempDir::new().unwrap();
    let recent = parse_json(&run_cli_success(dir.path(), &["stats", "recent", "--days", "3"]));
    let days = recent.as_object().unwrap();
    assert_eq!(days.len(), 3);
    for (date, record) in days {
        assert_eq!(record["date"], date.as_str());
    }
}

#[test]
fn test_stats_unknown_day_is_null() {
    let dir = TempDir::new().unwrap();
    let out = run_cli_success(dir.path(), &["stats", "day", "2001-01-01"]);
    assert_eq!(parse_json(&out), serde_json::Value::Null);
}

#[test]
fn test_stats_day_rejects_bad_date() {
    let dir = TempDir::new().unwrap();
    run_cli_failure(dir.path(), &["stats", "day", "yesterday"]);
}

#[test]
fn test_stats_reset() {
    let dir = TempDir::new().unwrap();
    let out = run_cli_success(dir.path(), &["stats", "reset"]);
    assert!(out.contains("stats reset"));
}

#[test]
fn test_config_set_then_get() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["config", "set", "automation.auto_start_break", "true"]);
    let out = run_cli_success(dir.path(), &["config", "get", "automation.auto_start_break"]);
    assert_eq!(out.trim(), "true");
}

#[test]
fn test_config_list_is_json() {
    let dir = TempDir::new().unwrap();
    let config = parse_json(&run_cli_success(dir.path(), &["config", "list"]));
    assert_eq!(config["schedule"]["focus_duration"], 25);
    assert_eq!(config["notifications"]["alarm_volume"], 70);
}

#[test]
fn test_config_unknown_key_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, _) = run_cli_failure(dir.path(), &["config", "get", "no.such.key"]);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_config_rejects_loud_volume() {
    let dir = TempDir::new().unwrap();
    run_cli_failure(dir.path(), &["config", "set", "notifications.alarm_volume", "150"]);
    let out = run_cli_success(dir.path(), &["config", "get", "notifications.alarm_volume"]);
    assert_eq!(out.trim(), "70");
}

#[test]
fn test_config_reset() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["config", "set", "schedule.focus_duration", "50"]);
    run_cli_success(dir.path(), &["config", "reset"]);
    let out = run_cli_success(dir.path(), &["config", "get", "schedule.focus_duration"]);
    assert_eq!(out.trim(), "25");
}

#[test]
fn test_timer_run_finishes_requested_intervals() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["config", "set", "schedule.focus_duration", "0"]);
    run_cli_success(dir.path(), &["config", "set", "schedule.short_break", "0"]);
    run_cli_success(dir.path(), &["timer", "skip"]);

    let out = run_cli_success(dir.path(), &["timer", "run", "--intervals", "2", "--json"]);
    let kinds: Vec<String> = out
        .lines()
        .map(parse_json)
        .map(|event| event["type"].as_str().unwrap().to_string())
        .filter(|kind| kind != "timer_tick")
        .collect();
    assert_eq!(
        kinds,
        vec![
            "timer_started",
            "timer_completed",
            "timer_skipped",
            "timer_started",
            "timer_completed",
            "timer_skipped",
        ]
    );

    let state = parse_json(&run_cli_success(dir.path(), &["timer", "status"]));
    assert_eq!(state["status"], "idle");
    assert_eq!(state["type"], "short_break");
    assert_eq!(state["session_count"], 2);
    assert_eq!(state["total_secs"], 1);

    let stats = parse_json(&run_cli_success(dir.path(), &["stats", "all"]));
    assert_eq!(stats["completed_focus_intervals"], 1);
}

#[test]
fn test_timer_run_rejects_zero_intervals() {
    let dir = TempDir::new().unwrap();
    run_cli_failure(dir.path(), &["timer", "run", "--intervals", "0"]);
    let state = parse_json(&run_cli_success(dir.path(), &["timer", "status"]));
    assert_eq!(state["status"], "idle");
}

#[test]
fn test_stats_recent_rejects_unbounded_days() {
    let dir = TempDir::new().unwrap();
    run_cli_failure(dir.path(), &["stats", "recent", "--days", "4294967295"]);
    run_cli_failure(dir.path(), &["stats", "recent", "--days", "0"]);
}
