//! # Features Layer
//!
//! Feature modules of the scheduling bot.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0

pub mod notifications;
pub mod scheduling;

pub use notifications::{Notifier, WebhookNotifier};
pub use scheduling::{
    schedule_key, ScheduleEntry, ScheduleGuard, ScheduleStore, SchedulerEngine, TimerJob,
    TimerService, TokioTimerService, DEFAULT_REMINDER_LEAD_MINUTES, RECURRENCE_MARKER,
    TIME_KEY_FORMAT,
};
