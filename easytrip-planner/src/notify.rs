//! Transient user notifications.

use std::time::{Duration, Instant};

use crate::PlannerPhase;

/// How long a notification stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Severity of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    /// A flow completed.
    Success,
    /// Nothing went wrong but nothing happened either.
    Info,
    /// A flow failed.
    Error,
}

/// A toast raised at the end of a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Stage the notification refers to.
    pub stage: PlannerPhase,
    /// Text shown to the user.
    pub message: String,
    /// When the notification was raised.
    pub raised_at: Instant,
}

impl Notification {
    /// Raise a notification now.
    pub fn new(level: NotificationLevel, stage: PlannerPhase, message: impl Into<String>) -> Self {
        Self {
            level,
            stage,
            message: message.into(),
            raised_at: Instant::now(),
        }
    }

    /// Whether the notification should have disappeared by `now`.
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= NOTIFICATION_TTL
    }
}
