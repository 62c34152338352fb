use std::rc::Rc;

use chrono::NaiveDate;
use clap::Subcommand;
use pomotimer_core::{Database, StatsAggregator, SystemClock};

/// Ten years of daily records.
const MAX_RECENT_DAYS: i64 = 3660;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's stats
    Today,
    /// All-time stats
    All,
    /// Stats for one day
    Day {
        /// Date as YYYY-MM-DD
        date: NaiveDate,
    },
    /// One record per day for the last N days, today included
    Recent {
        #[arg(
            long,
            default_value = "7",
            value_parser = clap::value_parser!(u32).range(1..=MAX_RECENT_DAYS)
        )]
        days: u32,
    },
    /// Clear all statistics
    Reset,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Rc::new(Database::open()?);
    let mut stats = StatsAggregator::new(db, SystemClock);

    match action {
        StatsAction::Today => {
            println!("{}", serde_json::to_string_pretty(&stats.get_today_stats())?);
        }
        StatsAction::All => {
            println!("{}", serde_json::to_string_pretty(&stats.get_stats())?);
        }
        StatsAction::Day { date } => {
            println!("{}", serde_json::to_string_pretty(&stats.get_daily_stats(date))?);
        }
        StatsAction::Recent { days } => {
            println!("{}", serde_json::to_string_pretty(&stats.get_recent_stats(days))?);
        }
        StatsAction::Reset => {
            stats.reset_stats();
            println!("stats reset");
        }
    }
    Ok(())
}
