use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    fn lifetime(&self) -> Duration {
        match self {
            NotificationKind::Error => Duration::from_secs(5),
            NotificationKind::Success | NotificationKind::Info => Duration::from_secs(3),
        }
    }
}

/// Transient message shown in the status bar
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    expires_at: Instant,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>, now: Instant) -> Self {
        Self {
            kind,
            message: message.into(),
            expires_at: now + kind.lifetime(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
