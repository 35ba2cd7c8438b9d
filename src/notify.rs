//! Ephemeral success/error notifications.
//!
//! One slot per kind, mirroring the single success and error banners of the
//! dashboard: a newer message of the same kind replaces the older one, and
//! each message expires a few seconds after creation, judged against the
//! engine clock.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;

/// Success banners live this long.
pub const SUCCESS_TTL: Duration = Duration::from_secs(5);
/// Chain failures live this long.
pub const ERROR_TTL: Duration = Duration::from_secs(5);
/// Client-side validation rejections are shorter-lived.
pub const VALIDATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NoteKind,
    pub message: String,
    /// Instant after which the notification is no longer shown.
    pub expires_at_ms: u64,
}

/// Holds the current banner per kind.
#[derive(Clone, Default)]
pub struct NotificationCenter {
    slots: Arc<DashMap<NoteKind, Notification>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a notification, replacing any existing one of the same kind.
    pub fn push(&self, kind: NoteKind, message: impl Into<String>, ttl: Duration, now_ms: u64) {
        let message = message.into();
        tracing::debug!(?kind, %message, "notification posted");
        self.slots.insert(
            kind,
            Notification {
                kind,
                message,
                expires_at_ms: now_ms + ttl.as_millis() as u64,
            },
        );
    }

    pub fn success(&self, message: impl Into<String>, now_ms: u64) {
        self.push(NoteKind::Success, message, SUCCESS_TTL, now_ms);
    }

    pub fn error(&self, message: impl Into<String>, ttl: Duration, now_ms: u64) {
        self.push(NoteKind::Error, message, ttl, now_ms);
    }

    /// Unexpired notifications, errors first. Expired slots are pruned.
    pub fn active(&self, now_ms: u64) -> Vec<Notification> {
        self.slots.retain(|_, n| n.expires_at_ms > now_ms);
        let mut notes: Vec<Notification> =
            self.slots.iter().map(|r| r.value().clone()).collect();
        notes.sort_by_key(|n| match n.kind {
            NoteKind::Error => 0,
            NoteKind::Success => 1,
        });
        notes
    }
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("slots", &self.slots.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_against_clock() {
        let center = NotificationCenter::new();
        center.success("Vault created successfully!", 1_000);

        assert_eq!(center.active(2_000).len(), 1);
        // 5s TTL: expired at exactly created + 5000.
        assert!(center.active(6_000).is_empty());
    }

    #[test]
    fn test_newer_replaces_same_kind() {
        let center = NotificationCenter::new();
        center.error("first", VALIDATION_TTL, 0);
        center.error("second", VALIDATION_TTL, 100);

        let active = center.active(200);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "second");
    }

    #[test]
    fn test_kinds_are_independent() {
        let center = NotificationCenter::new();
        center.success("approved", 0);
        center.error("rejected", ERROR_TTL, 0);

        let active = center.active(1);
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].kind, NoteKind::Error);
        assert_eq!(active[1].kind, NoteKind::Success);
    }
}
