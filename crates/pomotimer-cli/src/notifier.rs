//! Completion notices for the terminal.

use std::io::Write;

use pomotimer_core::notify::{CompletionSignal, Notifier};
use pomotimer_core::storage::{AlarmSound, NotificationsConfig};

/// Prints completion signals to stderr and rings the terminal bell.
pub struct TerminalNotifier {
    enabled: bool,
    sound: AlarmSound,
    volume: u32,
}

impl TerminalNotifier {
    pub fn from_config(config: &NotificationsConfig) -> Self {
        Self {
            enabled: config.enabled,
            sound: config.alarm_sound,
            volume: config.alarm_volume,
        }
    }

    /// Number of BEL characters written for one signal.
    fn bell_count(&self) -> usize {
        if self.volume == 0 {
            return 0;
        }
        match self.sound {
            AlarmSound::Bell => 1,
            AlarmSound::Digital => 3,
            AlarmSound::Gentle => 0,
        }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, signal: CompletionSignal) {
        if !self.enabled {
            tracing::debug!(%signal, "notifications disabled");
            return;
        }
        let mut err = std::io::stderr().lock();
        let bells = "\x07".repeat(self.bell_count());
        if let Err(e) = writeln!(err, "{bells}{signal}") {
            tracing::warn!(error = %e, "failed to show notification");
        }
    }
}
