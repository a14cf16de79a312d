//! # Scheduling Feature
//!
//! The scheduling core: the concurrent schedule store, the timer service
//! abstraction, and the engine that wires reminders and recurrence together.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

pub mod engine;
pub mod store;
pub mod timer;

pub use engine::{SchedulerEngine, DEFAULT_REMINDER_LEAD_MINUTES, RECURRENCE_MARKER};
pub use store::{schedule_key, ScheduleEntry, ScheduleGuard, ScheduleStore, TIME_KEY_FORMAT};
pub use timer::{TimerJob, TimerService, TokioTimerService};
