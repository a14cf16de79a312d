//! # Feature: Scheduling Engine
//!
//! The scheduling and notification core. Each added schedule registers a
//! pre-reminder timer (default 10 minutes before the start) and a start-time
//! timer. Messages carrying the weekly-recurrence marker additionally start a
//! lazy advance chain: one timer per occurrence that, on firing, materializes
//! the following week's occurrence and the next link of the chain.
//!
//! All collaborators (store, timer service, notifier) are injected at
//! construction. Every timer callback carries the owning entry's
//! [`ScheduleGuard`] and checks it at fire time, so removal silences
//! in-flight reminders and breaks the recurrence chain.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Cancellation guards on every timer, atomic recurrence guard
//! - 1.1.0: Weekly recurrence chain
//! - 1.0.0: Pre-reminder and start notifications

use chrono::{Duration, NaiveDateTime};
use log::{debug, info};
use std::sync::Arc;

use crate::features::notifications::Notifier;
use crate::features::scheduling::store::{
    ScheduleEntry, ScheduleGuard, ScheduleStore, TIME_KEY_FORMAT,
};
use crate::features::scheduling::timer::TimerService;

/// Literal marker inside a message that flags weekly repetition.
pub const RECURRENCE_MARKER: &str = "[정기]";

/// Default lead of the pre-reminder notification, in minutes.
pub const DEFAULT_REMINDER_LEAD_MINUTES: i64 = 10;

pub struct SchedulerEngine {
    store: Arc<ScheduleStore>,
    timers: Arc<dyn TimerService>,
    notifier: Arc<dyn Notifier>,
    reminder_lead: Duration,
}

impl SchedulerEngine {
    pub fn new(
        store: Arc<ScheduleStore>,
        timers: Arc<dyn TimerService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        SchedulerEngine {
            store,
            timers,
            notifier,
            reminder_lead: Duration::minutes(DEFAULT_REMINDER_LEAD_MINUTES),
        }
    }

    /// Override the pre-reminder lead (minutes before the start time).
    pub fn with_reminder_lead(mut self, minutes: i64) -> Self {
        self.reminder_lead = Duration::minutes(minutes);
        self
    }

    fn is_recurring(message: &str) -> bool {
        message.contains(RECURRENCE_MARKER)
    }

    /// Register a schedule and its timers.
    ///
    /// An identical (message, time) pair overwrites the existing entry; the
    /// replaced entry's timers are silenced through its guard. Past-due times
    /// are accepted and fire as soon as possible.
    pub fn add_schedule(self: &Arc<Self>, message: &str, time: NaiveDateTime) {
        let entry = ScheduleEntry::new(message, time);
        let guard = entry.guard.clone();
        info!("adding schedule '{}' at {time}", entry.key());
        self.store.insert(entry);

        self.schedule_notifications(message, time, &guard);
        if Self::is_recurring(message) {
            self.schedule_advance(message, time, &guard);
        }
    }

    /// Remove every occurrence of `message` (exact match on the original
    /// text) and silence its pending timers. Returns the number removed;
    /// removing an unknown message is a no-op.
    pub fn remove_schedule(&self, message: &str) -> usize {
        let removed = self.store.remove_by_message(message);
        for entry in &removed {
            entry.guard.cancel();
        }
        info!("removed {} occurrence(s) of '{message}'", removed.len());
        removed.len()
    }

    /// Snapshot of all pending schedules as "time - message" lines, sorted
    /// ascending by time.
    pub fn list_schedules(&self) -> Vec<String> {
        let mut entries = self.store.snapshot();
        entries.sort_by_key(|entry| entry.time);
        entries
            .iter()
            .map(|entry| format!("{} - {}", entry.time.format(TIME_KEY_FORMAT), entry.message))
            .collect()
    }

    /// Register the pre-reminder and start-time notifications for one
    /// occurrence, both under `guard`.
    fn schedule_notifications(&self, message: &str, time: NaiveDateTime, guard: &ScheduleGuard) {
        let lead_minutes = self.reminder_lead.num_minutes();
        self.schedule_send(
            time - self.reminder_lead,
            format!("⏳ 일정 시작 {lead_minutes}분 전: {message}"),
            guard.clone(),
        );
        self.schedule_send(time, format!("🚀 일정 시작: {message}"), guard.clone());
    }

    fn schedule_send(&self, at: NaiveDateTime, text: String, guard: ScheduleGuard) {
        let notifier = self.notifier.clone();
        self.timers.schedule(
            at,
            Box::pin(async move {
                if guard.is_active() {
                    notifier.send(&text).await;
                } else {
                    debug!("dropping notification for removed schedule: {text}");
                }
            }),
        );
    }

    /// Register the advance timer that materializes the occurrence one week
    /// after `time`. It fires at that next occurrence's start time.
    fn schedule_advance(self: &Arc<Self>, message: &str, time: NaiveDateTime, guard: &ScheduleGuard) {
        let engine = Arc::clone(self);
        let message = message.to_string();
        let guard = guard.clone();
        self.timers.schedule(
            time + Duration::weeks(1),
            Box::pin(async move {
                if guard.is_active() {
                    engine.advance_recurrence(&message, time);
                } else {
                    debug!("recurrence chain for '{message}' cancelled");
                }
            }),
        );
    }

    /// Timer-invoked: create the occurrence one week after `time` and the
    /// following link of the chain. A single atomic insert is the only
    /// duplicate guard, so overlapping invocations cannot double-register.
    fn advance_recurrence(self: &Arc<Self>, message: &str, time: NaiveDateTime) {
        let next = time + Duration::weeks(1);
        let entry = ScheduleEntry::new(message, next);
        let guard = entry.guard.clone();

        if self.store.insert_if_vacant(entry) {
            info!("recurring schedule '{message}' advanced to {next}");
            self.schedule_notifications(message, next, &guard);
            self.schedule_advance(message, next, &guard);
        } else {
            debug!("occurrence of '{message}' at {next} already registered");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::scheduling::store::schedule_key;
    use crate::features::scheduling::timer::TimerJob;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    /// Captures registered timers instead of spawning them, so tests can
    /// inspect due times and fire jobs deterministically.
    #[derive(Default)]
    struct RecordingTimer {
        jobs: Mutex<Vec<(NaiveDateTime, TimerJob)>>,
    }

    impl RecordingTimer {
        fn due_times(&self) -> Vec<NaiveDateTime> {
            self.jobs.lock().unwrap().iter().map(|(at, _)| *at).collect()
        }

        /// Drain all captured jobs. New registrations made while firing the
        /// drained jobs accumulate for the next drain.
        fn drain(&self) -> Vec<(NaiveDateTime, TimerJob)> {
            std::mem::take(&mut *self.jobs.lock().unwrap())
        }
    }

    impl TimerService for RecordingTimer {
        fn schedule(&self, at: NaiveDateTime, job: TimerJob) {
            self.jobs.lock().unwrap().push((at, job));
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, text: &str) {
            self.sent.lock().unwrap().push(text.to_string());
        }
    }

    struct Harness {
        engine: Arc<SchedulerEngine>,
        store: Arc<ScheduleStore>,
        timers: Arc<RecordingTimer>,
        notifier: Arc<RecordingNotifier>,
    }

    fn harness() -> Harness {
        let store = Arc::new(ScheduleStore::new());
        let timers = Arc::new(RecordingTimer::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let engine = Arc::new(SchedulerEngine::new(
            store.clone(),
            timers.clone(),
            notifier.clone(),
        ));
        Harness {
            engine,
            store,
            timers,
            notifier,
        }
    }

    fn jan(day: u32, hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    #[test]
    fn test_plain_add_registers_reminder_and_start_timers_only() {
        let h = harness();
        h.engine.add_schedule("Standup", jan(1, 10, 0));

        assert_eq!(h.timers.due_times(), vec![jan(1, 9, 50), jan(1, 10, 0)]);
        assert_eq!(h.store.len(), 1);
        assert!(h
            .store
            .remove(&schedule_key("Standup", jan(1, 10, 0)))
            .is_some());
    }

    #[test]
    fn test_recurring_add_registers_one_advance_timer() {
        let h = harness();
        h.engine.add_schedule("[정기] Standup", jan(1, 10, 0));

        assert_eq!(
            h.timers.due_times(),
            vec![jan(1, 9, 50), jan(1, 10, 0), jan(8, 10, 0)]
        );
        assert_eq!(h.store.len(), 1);
    }

    #[test]
    fn test_custom_reminder_lead() {
        let store = Arc::new(ScheduleStore::new());
        let timers = Arc::new(RecordingTimer::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let engine = Arc::new(
            SchedulerEngine::new(store, timers.clone(), notifier).with_reminder_lead(30),
        );

        engine.add_schedule("Standup", jan(1, 10, 0));
        assert_eq!(timers.due_times(), vec![jan(1, 9, 30), jan(1, 10, 0)]);
    }

    #[tokio::test]
    async fn test_notification_jobs_send_templated_texts() {
        let h = harness();
        h.engine.add_schedule("Standup", jan(1, 10, 0));

        for (_, job) in h.timers.drain() {
            job.await;
        }

        assert_eq!(
            h.notifier.sent(),
            vec![
                "⏳ 일정 시작 10분 전: Standup".to_string(),
                "🚀 일정 시작: Standup".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_advance_materializes_next_occurrence() {
        let h = harness();
        h.engine.add_schedule("[정기] Standup", jan(1, 10, 0));

        let mut jobs = h.timers.drain();
        let (advance_at, advance) = jobs.pop().unwrap();
        assert_eq!(advance_at, jan(8, 10, 0));
        advance.await;

        assert_eq!(h.store.len(), 2);
        assert!(h.store.contains_time(jan(8, 10, 0)));
        // Two fresh notification timers plus the next link of the chain.
        assert_eq!(
            h.timers.due_times(),
            vec![jan(8, 9, 50), jan(8, 10, 0), jan(15, 10, 0)]
        );
    }

    #[tokio::test]
    async fn test_advance_is_noop_when_occurrence_exists() {
        let h = harness();
        h.engine.add_schedule("[정기] Standup", jan(1, 10, 0));

        let mut jobs = h.timers.drain();
        let (_, advance) = jobs.pop().unwrap();

        // The next occurrence is already present by the time the timer fires.
        h.store
            .insert(ScheduleEntry::new("[정기] Standup", jan(8, 10, 0)));
        advance.await;

        assert_eq!(h.store.len(), 2);
        assert!(h.timers.due_times().is_empty());
    }

    #[tokio::test]
    async fn test_removal_silences_pending_timers() {
        let h = harness();
        h.engine.add_schedule("[정기] Standup", jan(1, 10, 0));
        assert_eq!(h.engine.remove_schedule("[정기] Standup"), 1);

        for (_, job) in h.timers.drain() {
            job.await;
        }

        assert!(h.notifier.sent().is_empty());
        assert!(h.store.is_empty());
        assert!(h.timers.due_times().is_empty());
    }

    #[test]
    fn test_remove_unknown_message_is_noop() {
        let h = harness();
        h.engine.add_schedule("Standup", jan(1, 10, 0));

        assert_eq!(h.engine.remove_schedule("Retro"), 0);
        assert_eq!(h.store.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_covers_materialized_occurrences() {
        let h = harness();
        h.engine.add_schedule("[정기] Standup", jan(1, 10, 0));

        let mut jobs = h.timers.drain();
        let (_, advance) = jobs.pop().unwrap();
        advance.await;
        assert_eq!(h.store.len(), 2);

        assert_eq!(h.engine.remove_schedule("[정기] Standup"), 2);
        assert!(h.store.is_empty());
    }

    #[test]
    fn test_list_is_sorted_and_formatted() {
        let h = harness();
        h.engine.add_schedule("Retro", jan(5, 17, 30));
        h.engine.add_schedule("Standup", jan(1, 10, 0));

        assert_eq!(
            h.engine.list_schedules(),
            vec![
                "2024-01-01T10:00 - Standup".to_string(),
                "2024-01-05T17:30 - Retro".to_string(),
            ]
        );
    }

    #[test]
    fn test_list_empty_store() {
        let h = harness();
        assert!(h.engine.list_schedules().is_empty());
    }

    #[test]
    fn test_identical_add_overwrites_silently() {
        let h = harness();
        h.engine.add_schedule("Standup", jan(1, 10, 0));
        h.engine.add_schedule("Standup", jan(1, 10, 0));

        assert_eq!(h.store.len(), 1);
        // Both adds registered their own timers; only the live entry's fire.
        assert_eq!(h.timers.due_times().len(), 4);
    }

    #[tokio::test]
    async fn test_overwritten_entry_timers_are_silenced() {
        let h = harness();
        h.engine.add_schedule("Standup", jan(1, 10, 0));
        let stale = h.timers.drain();

        h.engine.add_schedule("Standup", jan(1, 10, 0));
        for (_, job) in stale {
            job.await;
        }

        assert!(h.notifier.sent().is_empty());
    }
}
