use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn prefix(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "󰋼 INFO",
            NotificationLevel::Warning => "󰀪 WARN",
            NotificationLevel::Error => "󰅚 ERROR",
        }
    }

    /// How long a banner of this level stays up. Zap announcements are
    /// glanceable; playback errors linger longest.
    fn ttl(&self) -> Duration {
        match self {
            NotificationLevel::Info => Duration::from_secs(2),
            NotificationLevel::Warning => Duration::from_secs(3),
            NotificationLevel::Error => Duration::from_secs(4),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
    expires_at: Instant,
}

/// Transient on-screen banners: channel zap announcements, feature
/// warnings, playback errors. The application's user-facing log.
#[derive(Debug, Default)]
pub struct NotificationManager {
    queue: Vec<Notification>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, level: NotificationLevel, text: impl Into<String>) {
        self.queue.push(Notification {
            level,
            text: text.into(),
            expires_at: Instant::now() + level.ttl(),
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(NotificationLevel::Info, text);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(NotificationLevel::Warning, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(NotificationLevel::Error, text);
    }

    /// Drop expired banners; called once per main-loop tick.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.queue.retain(|n| n.expires_at > now);
    }

    pub fn active_notifications(&self) -> &[Notification] {
        &self.queue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_banners_survive_a_tick() {
        let mut manager = NotificationManager::new();
        manager.info("TF1 — Journal de 20h");
        manager.error("Erreur de lecture: 404");

        manager.tick();
        let active = manager.active_notifications();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].level, NotificationLevel::Info);
        assert_eq!(active[1].text, "Erreur de lecture: 404");
    }

    #[test]
    fn errors_outlive_zap_announcements() {
        assert!(NotificationLevel::Error.ttl() > NotificationLevel::Info.ttl());
        assert!(NotificationLevel::Warning.ttl() > NotificationLevel::Info.ttl());
    }
}
