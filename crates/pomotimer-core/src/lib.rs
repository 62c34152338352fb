//! # Pomotimer Core Library
//!
//! This library provides the core logic for the Pomotimer Pomodoro timer:
//! a countdown engine that cycles focus and break intervals, a statistics
//! aggregator fed by its completion events, and the storage they persist to.
//! The CLI binary is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based state machine. It never sleeps;
//!   a [`Scheduler`] delivers wake-ups that the host passes back to it
//! - **Event Bus**: Per-engine publish/subscribe registry for state changes
//! - **Statistics**: Global and per-day focus totals, persisted after every change
//! - **Storage**: SQLite key-value store and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`EventBus`]: Name-keyed listener registry
//! - [`StatsAggregator`]: Completion statistics
//! - [`PomodoroSession`]: Reacts to completions (notify, record, advance)
//! - [`Database`]: Key-value persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod event_bus;
pub mod events;
pub mod notify;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, StorageError};
pub use event_bus::{EventBus, ListenerId, ListenerResult, Subscription};
pub use events::{TimerEvent, TimerEventKind};
pub use notify::{CompletionSignal, Notifier};
pub use session::PomodoroSession;
pub use stats::{DailyStatRecord, StatsAggregator, StatsSnapshot};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use timer::{
    Clock, IntervalPlan, IntervalType, PartialTimerState, Scheduler, SystemClock, TimerEngine,
    TimerState, TimerStatus, TokioScheduler, WakeToken,
};
