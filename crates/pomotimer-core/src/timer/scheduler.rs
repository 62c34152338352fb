//! Wake-up scheduling for the timer loop.
//!
//! The engine never sleeps. It asks a [`Scheduler`] to deliver a
//! [`WakeToken`] after a delay, and the host hands that token back to
//! [`TimerEngine::wake`](super::TimerEngine::wake) when it arrives.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Identifies one scheduled wake-up.
///
/// Tokens carry the engine generation at the time they were issued; the
/// engine honors only the token it is currently waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WakeToken(u64);

impl WakeToken {
    pub fn new(generation: u64) -> Self {
        Self(generation)
    }

    pub fn generation(self) -> u64 {
        self.0
    }
}

pub trait Scheduler {
    /// Arrange for `token` to be delivered after `delay`.
    fn schedule_after(&mut self, delay: Duration, token: WakeToken);

    /// Withdraw a scheduled wake-up. Unknown or already delivered tokens
    /// are ignored.
    fn cancel(&mut self, token: WakeToken);
}

/// Scheduler that records requests and delivers nothing by itself.
///
/// Clones share the same queue. Tests pop tokens with [`Self::pop_next`] and
/// pass them to the engine after moving a [`ManualClock`](super::ManualClock).
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    pending: Rc<RefCell<Vec<(WakeToken, Duration)>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Vec<(WakeToken, Duration)> {
        self.pending.borrow().clone()
    }

    /// Remove and return the oldest outstanding wake-up.
    pub fn pop_next(&self) -> Option<(WakeToken, Duration)> {
        let mut pending = self.pending.borrow_mut();
        if pending.is_empty() {
            None
        } else {
            Some(pending.remove(0))
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&mut self, delay: Duration, token: WakeToken) {
        self.pending.borrow_mut().push((token, delay));
    }

    fn cancel(&mut self, token: WakeToken) {
        self.pending.borrow_mut().retain(|(t, _)| *t != token);
    }
}

/// Scheduler backed by tokio timers.
///
/// Each wake-up is a spawned sleep that sends its token on a channel; the
/// host drains the receiver and forwards tokens to the engine. Must be used
/// from within a tokio runtime.
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<WakeToken>,
    tasks: HashMap<WakeToken, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<WakeToken>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                tasks: HashMap::new(),
            },
            rx,
        )
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_after(&mut self, delay: Duration, token: WakeToken) {
        self.tasks.retain(|_, handle| !handle.is_finished());
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the host stopped listening.
            let _ = tx.send(token);
        });
        self.tasks.insert(token, handle);
    }

    fn cancel(&mut self, token: WakeToken) {
        if let Some(handle) = self.tasks.remove(&token) {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}
