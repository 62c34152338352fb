//! Completion signals handed to an external notification service.
//!
//! The core only names what finished. Presenting it, and asking the platform
//! for permission to do so, is the notifier's business.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::timer::IntervalType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionSignal {
    FocusComplete,
    ShortBreakComplete,
    LongBreakComplete,
}

impl CompletionSignal {
    pub fn as_str(self) -> &'static str {
        match self {
            CompletionSignal::FocusComplete => "Focus complete",
            CompletionSignal::ShortBreakComplete => "ShortBreak complete",
            CompletionSignal::LongBreakComplete => "LongBreak complete",
        }
    }

    /// Interval whose completion this signal reports.
    pub fn interval(self) -> IntervalType {
        match self {
            CompletionSignal::FocusComplete => IntervalType::Focus,
            CompletionSignal::ShortBreakComplete => IntervalType::ShortBreak,
            CompletionSignal::LongBreakComplete => IntervalType::LongBreak,
        }
    }
}

impl From<IntervalType> for CompletionSignal {
    fn from(interval: IntervalType) -> Self {
        match interval {
            IntervalType::Focus => CompletionSignal::FocusComplete,
            IntervalType::ShortBreak => CompletionSignal::ShortBreakComplete,
            IntervalType::LongBreak => CompletionSignal::LongBreakComplete,
        }
    }
}

impl std::fmt::Display for CompletionSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives completion signals. Implementations must not fail loudly; a
/// notification that cannot be shown is simply dropped.
pub trait Notifier {
    fn notify(&self, signal: CompletionSignal);
}

/// Keeps every signal it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: RefCell<Vec<CompletionSignal>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> Vec<CompletionSignal> {
        self.received.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, signal: CompletionSignal) {
        self.received.borrow_mut().push(signal);
    }
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, signal: CompletionSignal) {
        (**self).notify(signal)
    }
}
