//! Alarm evaluator: which medications are due at a given instant.
//!
//! A tick formats the instant as `HH:MM` and looks for that exact string
//! in every medication's time list. Matching is minute-granular string
//! equality; with a one-second tick a scheduled slot matches on every
//! tick of its minute. [`FirePolicy`] decides whether each of those ticks
//! notifies (`EveryTick`) or only the first (`OncePerMinute`).

pub mod notify;
pub mod ticker;

use std::collections::HashSet;

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;
use uuid::Uuid;

use crate::models::enums::{FirePolicy, NotificationPermission};
use crate::store::CareStore;

pub use notify::{Notification, Notifier, RecordingNotifier, TracingNotifier, NOTIFICATION_TITLE};
pub use ticker::{start_alarm_ticker, start_alarm_ticker_with_clock, AlarmTicker};

/// `HH:MM` key compared against medication time slots.
pub fn clock_key(instant: &NaiveDateTime) -> String {
    instant.format("%H:%M").to_string()
}

/// `HH:MM:SS` header clock.
pub fn clock_display(instant: &NaiveDateTime) -> String {
    instant.format("%H:%M:%S").to_string()
}

/// A medication due at the evaluated minute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlarmMatch {
    pub medication_id: Uuid,
    pub medication_name: String,
    pub dosage: String,
    /// `None` when the medication points at a patient that no longer exists.
    pub patient_name: Option<String>,
}

impl AlarmMatch {
    pub fn to_notification(&self) -> Notification {
        Notification {
            medication_id: self.medication_id,
            title: NOTIFICATION_TITLE.into(),
            body: format!(
                "{} - {} for {}",
                self.medication_name,
                self.dosage,
                self.patient_name.as_deref().unwrap_or_default()
            ),
        }
    }
}

/// Every medication whose time list contains `clock_key(instant)`, in
/// store order. Pure: no notification is sent.
pub fn matching_medications(store: &CareStore, instant: &NaiveDateTime) -> Vec<AlarmMatch> {
    let key = clock_key(instant);
    store
        .medications()
        .iter()
        .filter(|med| med.is_scheduled_at(&key))
        .map(|med| AlarmMatch {
            medication_id: med.id,
            medication_name: med.name.clone(),
            dosage: med.dosage.clone(),
            patient_name: store.patient_name(&med.patient_id).map(str::to_owned),
        })
        .collect()
}

/// What one tick saw and did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub clock: String,
    pub key: String,
    pub matches: Vec<AlarmMatch>,
    pub notified: usize,
    pub suppressed: usize,
}

/// Runs ticks against a store and forwards matches to a [`Notifier`].
pub struct AlarmEvaluator {
    notifier: Box<dyn Notifier>,
    permission: NotificationPermission,
    policy: FirePolicy,
    /// Minute currently being evaluated, truncated to `HH:MM:00`.
    current_minute: Option<NaiveDateTime>,
    /// Medications already notified during `current_minute`.
    notified_this_minute: HashSet<Uuid>,
}

impl AlarmEvaluator {
    /// Requests notification permission once, up front.
    pub fn new(notifier: Box<dyn Notifier>, policy: FirePolicy) -> Self {
        let permission = notifier.request_permission();
        tracing::info!(%permission, %policy, "Alarm evaluator ready");
        Self {
            notifier,
            permission,
            policy,
            current_minute: None,
            notified_this_minute: HashSet::new(),
        }
    }

    pub fn permission(&self) -> NotificationPermission {
        self.permission
    }

    pub fn policy(&self) -> FirePolicy {
        self.policy
    }

    /// Evaluate one tick. Matches are always computed; notifications go
    /// out only when permission was granted.
    pub fn tick(&mut self, store: &CareStore, instant: &NaiveDateTime) -> TickReport {
        self.roll_minute(instant);

        let matches = matching_medications(store, instant);
        let mut notified = 0;
        let mut suppressed = 0;

        if self.permission == NotificationPermission::Granted {
            for alarm in &matches {
                if self.policy == FirePolicy::OncePerMinute
                    && !self.notified_this_minute.insert(alarm.medication_id)
                {
                    suppressed += 1;
                    continue;
                }
                self.notifier.notify(&alarm.to_notification());
                notified += 1;
            }
        }

        if !matches.is_empty() {
            tracing::debug!(
                key = %clock_key(instant),
                matches = matches.len(),
                notified,
                suppressed,
                "Alarm tick matched"
            );
        }

        TickReport {
            clock: clock_display(instant),
            key: clock_key(instant),
            matches,
            notified,
            suppressed,
        }
    }

    fn roll_minute(&mut self, instant: &NaiveDateTime) {
        let minute = instant.with_second(0).and_then(|t| t.with_nanosecond(0));
        if minute != self.current_minute {
            self.current_minute = minute;
            self.notified_this_minute.clear();
        }
    }
}
