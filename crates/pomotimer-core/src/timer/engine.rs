//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-based state machine. It does not use
//! internal threads: it asks its [`Scheduler`] for a wake-up and the host
//! passes the delivered token back through [`TimerEngine::wake`].
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused -> Running)* -> Idle
//! ```
//!
//! Reaching zero, `reset` and `skip` all land in `Idle`. Completion does not
//! advance to the next interval; the host decides that by calling `skip`.
//!
//! ## Usage
//!
//! ```ignore
//! let (scheduler, mut wakes) = TokioScheduler::new();
//! let mut engine = TimerEngine::new(SystemClock, scheduler);
//! engine.start();
//! while let Some(token) = wakes.recv().await {
//!     if let Some(TimerEvent::TimerCompleted { .. }) = engine.wake(token) {
//!         break;
//!     }
//! }
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::interval::{IntervalPlan, IntervalType, DEFAULT_FOCUS_SECS};
use super::scheduler::{Scheduler, WakeToken};
use crate::event_bus::{EventBus, ListenerId, ListenerResult, Subscription};
use crate::events::{TimerEvent, TimerEventKind};

/// Delay between scheduler wake-ups while running.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

/// Snapshot of the engine. Always handed out by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub status: TimerStatus,
    /// Seconds left in the current interval. Never exceeds `total_secs`.
    pub remaining_secs: u64,
    /// Configured length of the current interval in seconds.
    pub total_secs: u64,
    #[serde(rename = "type")]
    pub interval_type: IntervalType,
    /// Focus intervals finished or skipped since the engine was created.
    pub session_count: u32,
}

impl TimerState {
    pub fn elapsed_secs(&self) -> u64 {
        self.total_secs.saturating_sub(self.remaining_secs)
    }

    /// 0.0 .. 1.0 progress within the current interval.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        self.elapsed_secs() as f64 / self.total_secs as f64
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            status: TimerStatus::Idle,
            remaining_secs: DEFAULT_FOCUS_SECS,
            total_secs: DEFAULT_FOCUS_SECS,
            interval_type: IntervalType::Focus,
            session_count: 0,
        }
    }
}

/// Initial engine state where any field may be left to its default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialTimerState {
    pub status: Option<TimerStatus>,
    pub remaining_secs: Option<u64>,
    pub total_secs: Option<u64>,
    #[serde(rename = "type")]
    pub interval_type: Option<IntervalType>,
    pub session_count: Option<u32>,
}

impl PartialTimerState {
    /// Fill in defaults and repair values that break the state invariants.
    ///
    /// A zero total falls back to the default focus length, remaining time
    /// is clamped to the total, and `Running` becomes `Paused` because no
    /// wake-up is scheduled for a freshly built engine.
    pub fn resolve(self) -> TimerState {
        let defaults = TimerState::default();
        let total_secs = match self.total_secs {
            Some(0) | None => defaults.total_secs,
            Some(total) => total,
        };
        let remaining_secs = self.remaining_secs.unwrap_or(total_secs).min(total_secs);
        let status = match self.status.unwrap_or(defaults.status) {
            TimerStatus::Running => TimerStatus::Paused,
            other => other,
        };
        TimerState {
            status,
            remaining_secs,
            total_secs,
            interval_type: self.interval_type.unwrap_or(defaults.interval_type),
            session_count: self.session_count.unwrap_or(defaults.session_count),
        }
    }
}

impl From<TimerState> for PartialTimerState {
    fn from(state: TimerState) -> Self {
        Self {
            status: Some(state.status),
            remaining_secs: Some(state.remaining_secs),
            total_secs: Some(state.total_secs),
            interval_type: Some(state.interval_type),
            session_count: Some(state.session_count),
        }
    }
}

/// Core timer engine.
///
/// Every control method is total: calling one in a status where it does not
/// apply returns `None` and changes nothing. Each state change is published
/// on the engine's own bus and also returned to the caller.
pub struct TimerEngine {
    state: TimerState,
    clock: Box<dyn Clock>,
    scheduler: Box<dyn Scheduler>,
    bus: EventBus<TimerEventKind, TimerState>,
    /// Wall-clock reference for the next elapsed-time measurement.
    last_tick: Option<DateTime<Utc>>,
    /// Bumped for every scheduled wake-up; the source of token identity.
    generation: u64,
    /// The only wake-up the engine will act on.
    pending_wake: Option<WakeToken>,
}

impl TimerEngine {
    /// Create an engine with the default state: idle, 25 minutes of focus.
    pub fn new(clock: impl Clock + 'static, scheduler: impl Scheduler + 'static) -> Self {
        Self::with_state(clock, scheduler, PartialTimerState::default())
    }

    pub fn with_state(
        clock: impl Clock + 'static,
        scheduler: impl Scheduler + 'static,
        initial: PartialTimerState,
    ) -> Self {
        Self {
            state: initial.resolve(),
            clock: Box::new(clock),
            scheduler: Box::new(scheduler),
            bus: EventBus::new(),
            last_tick: None,
            generation: 0,
            pending_wake: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn get_state(&self) -> TimerState {
        self.state
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status
    }

    pub fn pending_wake(&self) -> Option<WakeToken> {
        self.pending_wake
    }

    // ── Listeners ────────────────────────────────────────────────────

    pub fn add_event_listener<F>(
        &self,
        kind: TimerEventKind,
        callback: F,
    ) -> Subscription<TimerEventKind, TimerState>
    where
        F: Fn(&TimerState) -> ListenerResult + 'static,
    {
        self.bus.subscribe(kind, callback)
    }

    pub fn remove_event_listener(&self, kind: TimerEventKind, id: ListenerId) -> bool {
        self.bus.unsubscribe(&kind, id)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<TimerEvent> {
        match self.state.status {
            TimerStatus::Running => None,
            TimerStatus::Idle | TimerStatus::Paused => {
                self.state.status = TimerStatus::Running;
                self.last_tick = Some(self.clock.now());
                tracing::debug!(
                    interval = %self.state.interval_type,
                    remaining_secs = self.state.remaining_secs,
                    "timer started"
                );
                let event = self.emit(TimerEventKind::Start);
                self.schedule_wake();
                Some(event)
            }
        }
    }

    pub fn pause(&mut self) -> Option<TimerEvent> {
        if self.state.status != TimerStatus::Running {
            return None;
        }
        self.cancel_wake();
        self.state.status = TimerStatus::Paused;
        self.last_tick = None;
        tracing::debug!(remaining_secs = self.state.remaining_secs, "timer paused");
        Some(self.emit(TimerEventKind::Pause))
    }

    pub fn resume(&mut self) -> Option<TimerEvent> {
        match self.state.status {
            TimerStatus::Paused => self.start(),
            _ => None,
        }
    }

    /// Back to `Idle` with the full interval remaining. Interval type and
    /// session count are kept.
    pub fn reset(&mut self) -> Option<TimerEvent> {
        self.cancel_wake();
        self.state.status = TimerStatus::Idle;
        self.state.remaining_secs = self.state.total_secs;
        self.last_tick = None;
        tracing::debug!(interval = %self.state.interval_type, "timer reset");
        Some(self.emit(TimerEventKind::Reset))
    }

    /// Move to the interval that follows the current one under `plan`.
    pub fn skip(&mut self, plan: &IntervalPlan) -> Option<TimerEvent> {
        self.cancel_wake();
        let from = self.state.interval_type;
        let (next, session_count) = plan.next(from, self.state.session_count);
        self.state.interval_type = next;
        self.state.session_count = session_count;
        self.state.total_secs = plan.duration_secs(next);
        self.state.remaining_secs = self.state.total_secs;
        self.state.status = TimerStatus::Idle;
        self.last_tick = None;
        tracing::debug!(%from, to = %next, session_count, "interval skipped");
        Some(self.emit(TimerEventKind::Skip))
    }

    /// Handle a wake-up delivered by the scheduler.
    ///
    /// Whole seconds elapsed since the last measurement are subtracted from
    /// the remaining time. The sub-second remainder is dropped each time
    /// time is consumed; because `now` is re-sampled on every wake-up the
    /// loss stays within one wake-up's jitter and does not compound.
    ///
    /// Returns `Tick` while time remains, `Completed` (and no `Tick`) when it
    /// reaches zero, and `None` for stale tokens or wake-ups that found less
    /// than a second elapsed.
    pub fn wake(&mut self, token: WakeToken) -> Option<TimerEvent> {
        if self.pending_wake != Some(token) {
            tracing::trace!(generation = token.generation(), "ignoring stale wake-up");
            return None;
        }
        self.pending_wake = None;
        if self.state.status != TimerStatus::Running {
            return None;
        }

        let now = self.clock.now();
        let last = *self.last_tick.get_or_insert(now);
        if now < last {
            // Wall clock stepped back; measure from the new position.
            tracing::debug!(%last, %now, "clock moved backwards");
            self.last_tick = Some(now);
        }
        let elapsed = whole_seconds_between(last, now);
        if elapsed == 0 {
            self.schedule_wake();
            return None;
        }

        self.last_tick = Some(now);
        self.state.remaining_secs = self.state.remaining_secs.saturating_sub(elapsed);

        if self.state.remaining_secs == 0 {
            self.state.status = TimerStatus::Idle;
            self.last_tick = None;
            tracing::debug!(interval = %self.state.interval_type, "interval complete");
            return Some(self.emit(TimerEventKind::Complete));
        }

        let event = self.emit(TimerEventKind::Tick);
        self.schedule_wake();
        Some(event)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn emit(&self, kind: TimerEventKind) -> TimerEvent {
        let state = self.state;
        self.bus.publish(&kind, &state);
        TimerEvent::new(kind, state, self.clock.now())
    }

    fn schedule_wake(&mut self) {
        self.generation += 1;
        let token = WakeToken::new(self.generation);
        self.pending_wake = Some(token);
        self.scheduler.schedule_after(TICK_INTERVAL, token);
    }

    fn cancel_wake(&mut self) {
        if let Some(token) = self.pending_wake.take() {
            self.scheduler.cancel(token);
        }
    }
}

fn whole_seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    u64::try_from((to - from).num_seconds()).unwrap_or(0)
}
