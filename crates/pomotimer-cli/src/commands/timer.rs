use std::io::Write;
use std::rc::Rc;

use clap::Subcommand;
use pomotimer_core::storage::{self, Database, TIMER_STATE_KEY};
use pomotimer_core::timer::ManualScheduler;
use pomotimer_core::{
    Config, PartialTimerState, PomodoroSession, StatsAggregator, SystemClock, TimerEngine,
    TimerEvent, TimerEventKind, TimerState, TimerStatus, TokioScheduler,
};

use crate::notifier::TerminalNotifier;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in the foreground, resuming the saved interval
    Run {
        /// Number of intervals to finish before exiting
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        intervals: u32,
        /// Print every event as a JSON line instead of a countdown
        #[arg(long)]
        json: bool,
    },
    /// Move on to the next interval without recording the current one
    Skip,
    /// Restore the full length of the current interval
    Reset,
    /// Print the saved timer state as JSON
    Status,
}

fn load_state(db: &Database) -> PartialTimerState {
    storage::load(db, TIMER_STATE_KEY, PartialTimerState::default())
}

fn save_state(db: &Database, state: TimerState) {
    storage::save(db, TIMER_STATE_KEY, &state);
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Rc::new(Database::open()?);

    match action {
        TimerAction::Run { intervals, json } => run_foreground(db, intervals, json)?,
        TimerAction::Skip => {
            let config = Config::load()?;
            let mut engine =
                TimerEngine::with_state(SystemClock, ManualScheduler::new(), load_state(&db));
            engine.skip(&config.interval_plan());
            let state = engine.get_state();
            save_state(&db, state);
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        TimerAction::Reset => {
            let mut engine =
                TimerEngine::with_state(SystemClock, ManualScheduler::new(), load_state(&db));
            engine.reset();
            let state = engine.get_state();
            save_state(&db, state);
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        TimerAction::Status => {
            let state = load_state(&db).resolve();
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
    }
    Ok(())
}

fn run_foreground(
    db: Rc<Database>,
    intervals: u32,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let (scheduler, mut wakes) = TokioScheduler::new();
        let engine = TimerEngine::with_state(SystemClock, scheduler, load_state(&db));
        let stats = StatsAggregator::new(Rc::clone(&db), SystemClock);
        let notifier = TerminalNotifier::from_config(&config.notifications);
        let mut session = PomodoroSession::new(engine, stats, notifier, &config);

        let mut finished = 0;
        if let Some(event) = session.start() {
            report(&event, json)?;
        }
        save_state(&db, session.state());

        while finished < intervals {
            tokio::select! {
                token = wakes.recv() => {
                    let Some(token) = token else { break };
                    for event in session.wake(token) {
                        if event.kind() == TimerEventKind::Complete {
                            finished += 1;
                        }
                        report(&event, json)?;
                    }
                    save_state(&db, session.state());
                    if finished < intervals && session.engine().status() == TimerStatus::Idle {
                        if let Some(event) = session.start() {
                            report(&event, json)?;
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    if let Some(event) = session.pause() {
                        report(&event, json)?;
                    }
                    save_state(&db, session.state());
                    break;
                }
            }
        }
        tracing::debug!(finished, "foreground run finished");
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}

fn report(event: &TimerEvent, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }

    let state = event.state();
    let mut out = std::io::stdout().lock();
    match event.kind() {
        TimerEventKind::Tick => {
            write!(
                out,
                "\r{:<11} {} {:>3.0}%",
                state.interval_type.label(),
                format_remaining(state.remaining_secs),
                state.progress() * 100.0
            )?;
            out.flush()?;
        }
        TimerEventKind::Start => writeln!(
            out,
            "{} started ({})",
            state.interval_type.label(),
            format_remaining(state.remaining_secs)
        )?,
        TimerEventKind::Pause => writeln!(
            out,
            "\npaused at {}",
            format_remaining(state.remaining_secs)
        )?,
        TimerEventKind::Complete => writeln!(out, "\r{} complete", state.interval_type.label())?,
        TimerEventKind::Skip => writeln!(out, "next: {}", state.interval_type.label())?,
        TimerEventKind::Reset => writeln!(out, "reset")?,
    }
    Ok(())
}

/// `MM:SS`, with minutes allowed to exceed 59.
fn format_remaining(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_time_is_minutes_and_seconds() {
        assert_eq!(format_remaining(0), "00:00");
        assert_eq!(format_remaining(59), "00:59");
        assert_eq!(format_remaining(1500), "25:00");
        assert_eq!(format_remaining(3725), "62:05");
    }
}
