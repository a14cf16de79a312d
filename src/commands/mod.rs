//! # Command System
//!
//! Conversational request handling for the scheduling bot.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

pub mod handler;
pub mod request;

pub use handler::{
    ScheduleCommandHandler, RESPONSE_ADDED, RESPONSE_EMPTY_LIST, RESPONSE_REMOVED,
};
pub use request::{CommandError, ScheduleCommand};
