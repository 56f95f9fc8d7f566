//! Notification sink for matched alarms.
//!
//! Matching is pure (see [`super::matching_medications`]); emitting is a
//! side effect behind [`Notifier`] so the evaluator can be driven in tests
//! without a real notification channel.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use uuid::Uuid;

use crate::models::enums::NotificationPermission;

pub const NOTIFICATION_TITLE: &str = "Medication time!";

/// One notification for one matched medication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub medication_id: Uuid,
    pub title: String,
    pub body: String,
}

/// Platform notification channel.
pub trait Notifier: Send + Sync {
    /// Ask the platform for permission. Called once, before the first tick.
    fn request_permission(&self) -> NotificationPermission;

    fn notify(&self, notification: &Notification);
}

/// Writes notifications to the log. Always granted.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn request_permission(&self) -> NotificationPermission {
        NotificationPermission::Granted
    }

    fn notify(&self, notification: &Notification) {
        tracing::warn!(
            medication_id = %notification.medication_id,
            "{}: {}",
            notification.title,
            notification.body
        );
    }
}

/// Collects notifications in memory. Clones share the same buffer, so a
/// clone can be handed to the evaluator while this one is inspected.
#[derive(Debug, Clone)]
pub struct RecordingNotifier {
    permission: NotificationPermission,
    sent: Arc<Mutex<Vec<Notification>>>,
    permission_requests: Arc<AtomicUsize>,
}

impl RecordingNotifier {
    pub fn new(permission: NotificationPermission) -> Self {
        Self {
            permission,
            sent: Arc::new(Mutex::new(Vec::new())),
            permission_requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// How many times `request_permission` has been called.
    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn request_permission(&self) -> NotificationPermission {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        self.permission
    }

    fn notify(&self, notification: &Notification) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notification.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Notification {
        Notification {
            medication_id: Uuid::nil(),
            title: NOTIFICATION_TITLE.into(),
            body: "Losartana - 50mg for Maria Silva".into(),
        }
    }

    #[test]
    fn tracing_notifier_is_granted() {
        let notifier = TracingNotifier;
        assert_eq!(notifier.request_permission(), NotificationPermission::Granted);
        notifier.notify(&sample());
    }

    #[test]
    fn recording_notifier_shares_buffer_across_clones() {
        let recorder = RecordingNotifier::new(NotificationPermission::Denied);
        let handed_out = recorder.clone();
        handed_out.notify(&sample());

        assert_eq!(recorder.sent(), vec![sample()]);
        assert_eq!(recorder.request_permission(), NotificationPermission::Denied);
    }
}
