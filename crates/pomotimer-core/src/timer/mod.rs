mod clock;
mod engine;
mod interval;
mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{PartialTimerState, TimerEngine, TimerState, TimerStatus, TICK_INTERVAL};
pub use interval::{IntervalPlan, IntervalType, DEFAULT_FOCUS_SECS};
pub use scheduler::{ManualScheduler, Scheduler, TokioScheduler, WakeToken};
