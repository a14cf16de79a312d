//! # Command Handler
//!
//! Executes validated scheduling requests against the engine and produces the
//! bot's fixed response texts. Responses are plain strings; the caller relays
//! them to the user's channel.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use std::sync::Arc;

use crate::commands::request::ScheduleCommand;
use crate::features::scheduling::SchedulerEngine;

pub const RESPONSE_ADDED: &str = "✅ 일정이 추가되었습니다.";
pub const RESPONSE_REMOVED: &str = "✅ 일정이 삭제되었습니다.";
pub const RESPONSE_EMPTY_LIST: &str = "📭 등록된 일정이 없습니다.";

pub struct ScheduleCommandHandler {
    engine: Arc<SchedulerEngine>,
}

impl ScheduleCommandHandler {
    pub fn new(engine: Arc<SchedulerEngine>) -> Self {
        ScheduleCommandHandler { engine }
    }

    /// Execute one request and return the response text for the channel.
    pub fn handle(&self, command: ScheduleCommand) -> String {
        match command {
            ScheduleCommand::Add { content, start } => {
                self.engine.add_schedule(&content, start);
                RESPONSE_ADDED.to_string()
            }
            ScheduleCommand::Remove { content } => {
                self.engine.remove_schedule(&content);
                RESPONSE_REMOVED.to_string()
            }
            ScheduleCommand::List => {
                let schedules = self.engine.list_schedules();
                if schedules.is_empty() {
                    RESPONSE_EMPTY_LIST.to_string()
                } else {
                    schedules.join("\n")
                }
            }
        }
    }
}
