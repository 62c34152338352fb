use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerState;

/// Name under which a timer event is published on the engine's bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerEventKind {
    Start,
    Pause,
    Reset,
    Skip,
    Tick,
    Complete,
}

impl TimerEventKind {
    pub const ALL: [TimerEventKind; 6] = [
        TimerEventKind::Start,
        TimerEventKind::Pause,
        TimerEventKind::Reset,
        TimerEventKind::Skip,
        TimerEventKind::Tick,
        TimerEventKind::Complete,
    ];

    /// Namespaced event name, e.g. `timer:tick`.
    pub fn as_str(self) -> &'static str {
        match self {
            TimerEventKind::Start => "timer:start",
            TimerEventKind::Pause => "timer:pause",
            TimerEventKind::Reset => "timer:reset",
            TimerEventKind::Skip => "timer:skip",
            TimerEventKind::Tick => "timer:tick",
            TimerEventKind::Complete => "timer:complete",
        }
    }
}

impl std::fmt::Display for TimerEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every timer state change produces an Event carrying the full state after
/// the change. Control methods return it; listeners receive its state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    TimerStarted {
        state: TimerState,
        at: DateTime<Utc>,
    },
    TimerPaused {
        state: TimerState,
        at: DateTime<Utc>,
    },
    TimerReset {
        state: TimerState,
        at: DateTime<Utc>,
    },
    TimerSkipped {
        state: TimerState,
        at: DateTime<Utc>,
    },
    TimerTick {
        state: TimerState,
        at: DateTime<Utc>,
    },
    /// Remaining time reached zero. `state.interval_type` is the interval
    /// that finished; the engine does not advance on its own.
    TimerCompleted {
        state: TimerState,
        at: DateTime<Utc>,
    },
}

impl TimerEvent {
    pub fn new(kind: TimerEventKind, state: TimerState, at: DateTime<Utc>) -> Self {
        match kind {
            TimerEventKind::Start => TimerEvent::TimerStarted { state, at },
            TimerEventKind::Pause => TimerEvent::TimerPaused { state, at },
            TimerEventKind::Reset => TimerEvent::TimerReset { state, at },
            TimerEventKind::Skip => TimerEvent::TimerSkipped { state, at },
            TimerEventKind::Tick => TimerEvent::TimerTick { state, at },
            TimerEventKind::Complete => TimerEvent::TimerCompleted { state, at },
        }
    }

    pub fn kind(&self) -> TimerEventKind {
        match self {
            TimerEvent::TimerStarted { .. } => TimerEventKind::Start,
            TimerEvent::TimerPaused { .. } => TimerEventKind::Pause,
            TimerEvent::TimerReset { .. } => TimerEventKind::Reset,
            TimerEvent::TimerSkipped { .. } => TimerEventKind::Skip,
            TimerEvent::TimerTick { .. } => TimerEventKind::Tick,
            TimerEvent::TimerCompleted { .. } => TimerEventKind::Complete,
        }
    }

    pub fn state(&self) -> &TimerState {
        match self {
            TimerEvent::TimerStarted { state, .. }
            | TimerEvent::TimerPaused { state, .. }
            | TimerEvent::TimerReset { state, .. }
            | TimerEvent::TimerSkipped { state, .. }
            | TimerEvent::TimerTick { state, .. }
            | TimerEvent::TimerCompleted { state, .. } => state,
        }
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            TimerEvent::TimerStarted { at, .. }
            | TimerEvent::TimerPaused { at, .. }
            | TimerEvent::TimerReset { at, .. }
            | TimerEvent::TimerSkipped { at, .. }
            | TimerEvent::TimerTick { at, .. }
            | TimerEvent::TimerCompleted { at, .. } => *at,
        }
    }
}
