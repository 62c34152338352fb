//! Host-side driver that ties the timer engine to statistics and
//! notifications.
//!
//! The engine stops at zero and reports what finished. This driver reacts to
//! that: it signals the notifier, records focus time, advances to the next
//! interval and, when configured, starts it.

use crate::events::TimerEvent;
use crate::notify::{CompletionSignal, Notifier};
use crate::stats::StatsAggregator;
use crate::storage::{AutomationConfig, Config, KeyValueStore};
use crate::timer::{IntervalPlan, TimerEngine, TimerState, WakeToken};

pub struct PomodoroSession<S, N> {
    engine: TimerEngine,
    stats: StatsAggregator<S>,
    notifier: N,
    plan: IntervalPlan,
    automation: AutomationConfig,
}

impl<S: KeyValueStore, N: Notifier> PomodoroSession<S, N> {
    pub fn new(
        engine: TimerEngine,
        stats: StatsAggregator<S>,
        notifier: N,
        config: &Config,
    ) -> Self {
        Self {
            engine,
            stats,
            notifier,
            plan: config.interval_plan(),
            automation: config.automation.clone(),
        }
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn stats(&self) -> &StatsAggregator<S> {
        &self.stats
    }

    pub fn plan(&self) -> &IntervalPlan {
        &self.plan
    }

    pub fn state(&self) -> TimerState {
        self.engine.get_state()
    }

    pub fn start(&mut self) -> Option<TimerEvent> {
        self.engine.start()
    }

    pub fn pause(&mut self) -> Option<TimerEvent> {
        self.engine.pause()
    }

    pub fn resume(&mut self) -> Option<TimerEvent> {
        self.engine.resume()
    }

    pub fn reset(&mut self) -> Option<TimerEvent> {
        self.engine.reset()
    }

    /// Skip to the next interval using the configured plan.
    pub fn skip(&mut self) -> Option<TimerEvent> {
        self.engine.skip(&self.plan)
    }

    /// Forward a scheduler wake-up to the engine and react to completion.
    ///
    /// Returns every event produced, in order: the tick or completion, then
    /// the skip to the next interval and the start if it began on its own.
    pub fn wake(&mut self, token: WakeToken) -> Vec<TimerEvent> {
        let Some(event) = self.engine.wake(token) else {
            return Vec::new();
        };

        let mut events = Vec::with_capacity(3);
        let completed = match &event {
            TimerEvent::TimerCompleted { state, .. } => Some(*state),
            _ => None,
        };
        events.push(event);

        if let Some(state) = completed {
            events.extend(self.finish_interval(&state));
        }
        events
    }

    fn finish_interval(&mut self, finished: &TimerState) -> Vec<TimerEvent> {
        let signal = CompletionSignal::from(finished.interval_type);
        tracing::info!(%signal, session_count = finished.session_count, "interval finished");
        self.notifier.notify(signal);
        self.stats
            .record_completion(finished.total_secs, finished.interval_type);

        let mut events = Vec::with_capacity(2);
        events.extend(self.engine.skip(&self.plan));

        let next = self.engine.get_state().interval_type;
        let auto_start = if next.is_break() {
            self.automation.auto_start_break
        } else {
            self.automation.auto_start_focus
        };
        if auto_start {
            events.extend(self.engine.start());
        }
        events
    }
}
