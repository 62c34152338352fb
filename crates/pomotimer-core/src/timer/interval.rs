use serde::{Deserialize, Serialize};

/// Default focus interval length in seconds (25 minutes).
pub const DEFAULT_FOCUS_SECS: u64 = 25 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalType {
    Focus,
    ShortBreak,
    LongBreak,
}

impl IntervalType {
    pub fn is_break(self) -> bool {
        !matches!(self, IntervalType::Focus)
    }

    pub fn label(self) -> &'static str {
        match self {
            IntervalType::Focus => "Focus",
            IntervalType::ShortBreak => "ShortBreak",
            IntervalType::LongBreak => "LongBreak",
        }
    }
}

impl std::fmt::Display for IntervalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Interval lengths and long-break cadence used when advancing the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalPlan {
    pub focus_secs: u64,
    pub short_break_secs: u64,
    pub long_break_secs: u64,
    /// Completed focus sessions between long breaks. Zero disables long breaks.
    pub long_break_interval: u32,
}

impl IntervalPlan {
    /// Build a plan from minute values, as stored in the config file.
    pub fn from_minutes(
        focus: u32,
        short_break: u32,
        long_break: u32,
        long_break_interval: u32,
    ) -> Self {
        Self {
            focus_secs: u64::from(focus).saturating_mul(60),
            short_break_secs: u64::from(short_break).saturating_mul(60),
            long_break_secs: u64::from(long_break).saturating_mul(60),
            long_break_interval,
        }
    }

    /// Configured length of `interval` in seconds, never less than one.
    pub fn duration_secs(&self, interval: IntervalType) -> u64 {
        let secs = match interval {
            IntervalType::Focus => self.focus_secs,
            IntervalType::ShortBreak => self.short_break_secs,
            IntervalType::LongBreak => self.long_break_secs,
        };
        secs.max(1)
    }

    /// Interval that follows `current`, and the session count after it.
    ///
    /// Finishing (or skipping) a focus interval counts as one session; the
    /// break after it is long when the new count is a multiple of
    /// `long_break_interval`. Any break is followed by focus.
    pub fn next(&self, current: IntervalType, session_count: u32) -> (IntervalType, u32) {
        match current {
            IntervalType::Focus => {
                let sessions = session_count.saturating_add(1);
                let long =
                    self.long_break_interval != 0 && sessions % self.long_break_interval == 0;
                let next = if long {
                    IntervalType::LongBreak
                } else {
                    IntervalType::ShortBreak
                };
                (next, sessions)
            }
            IntervalType::ShortBreak | IntervalType::LongBreak => {
                (IntervalType::Focus, session_count)
            }
        }
    }
}

impl Default for IntervalPlan {
    fn default() -> Self {
        Self::from_minutes(25, 5, 15, 4)
    }
}
