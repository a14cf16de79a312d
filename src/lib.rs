// Core layer - shared configuration
pub mod core;

// Features layer - scheduling and notification modules
pub mod features;

// Application layer - conversational command handling
pub mod commands;

// Re-export core config
pub use core::Config;

// Re-export feature items
pub use features::{
    // Notifications
    Notifier, WebhookNotifier,
    // Scheduling
    ScheduleEntry, ScheduleGuard, ScheduleStore, SchedulerEngine, TimerJob, TimerService,
    TokioTimerService, RECURRENCE_MARKER,
};

// Re-export command items
pub use commands::{CommandError, ScheduleCommand, ScheduleCommandHandler};
