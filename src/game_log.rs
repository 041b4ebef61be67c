//! On-screen game log
//!
//! Keeps the most recent gameplay messages for an overlay. Retention is
//! bounded: once full, the oldest message is dropped for each new one.

use std::collections::VecDeque;

use crate::config::LogSettings;
use crate::sim::SessionEvent;

/// Bounded FIFO of formatted event messages
#[derive(Debug, Clone)]
pub struct GameLog {
    messages: VecDeque<String>,
    settings: LogSettings,
}

impl GameLog {
    pub fn new(settings: LogSettings) -> Self {
        Self {
            messages: VecDeque::with_capacity(settings.max_visible_messages),
            settings,
        }
    }

    /// Record one event (no-op when the log is disabled)
    pub fn record(&mut self, event: &SessionEvent) {
        if !self.settings.enabled || self.settings.max_visible_messages == 0 {
            return;
        }

        let message = event.to_string();
        if self.settings.mirror_to_console {
            log::info!("{message}");
        }

        while self.messages.len() >= self.settings.max_visible_messages {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// Record a batch drained from the session
    pub fn extend<'a>(&mut self, events: impl IntoIterator<Item = &'a SessionEvent>) {
        for event in events {
            self.record(event);
        }
    }

    /// Oldest first
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SessionEventKind;

    fn fired(n: u32) -> SessionEvent {
        SessionEvent {
            time: n as f32 * 0.5,
            kind: SessionEventKind::ProjectileFired { projectile: n },
        }
    }

    fn settings(max: usize) -> LogSettings {
        LogSettings {
            enabled: true,
            max_visible_messages: max,
            mirror_to_console: false,
        }
    }

    #[test]
    fn test_oldest_messages_are_evicted() {
        let mut log = GameLog::new(settings(3));
        let events: Vec<_> = (0..5).map(fired).collect();
        log.extend(&events);

        let messages: Vec<_> = log.messages().collect();
        assert_eq!(
            messages,
            vec![
                "Projectile 2 fired - 1.00",
                "Projectile 3 fired - 1.50",
                "Projectile 4 fired - 2.00",
            ]
        );
    }

    #[test]
    fn test_disabled_log_records_nothing() {
        let mut log = GameLog::new(LogSettings {
            enabled: false,
            ..settings(3)
        });
        log.record(&fired(1));
        assert!(log.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut log = GameLog::new(settings(2));
        log.record(&fired(1));
        assert_eq!(log.len(), 1);
        log.clear();
        assert!(log.is_empty());
    }
}
