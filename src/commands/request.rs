//! # Command Requests
//!
//! Parsing and validation of conversational scheduling requests. The chat
//! form supplies an action plus optional date, time, and content fields; the
//! date and time are concatenated into an ISO-like `date"T"time` string and
//! parsed as one local timestamp. Validation failures become user-visible
//! response text and never reach the engine.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use chrono::NaiveDateTime;
use std::fmt;

/// A validated scheduling request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleCommand {
    Add { content: String, start: NaiveDateTime },
    Remove { content: String },
    List,
}

/// Request-level failures, each carrying its user-visible response text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    MissingDateTime,
    InvalidDateTime,
    MissingContent,
    Unsupported,
}

impl CommandError {
    pub fn user_message(&self) -> &'static str {
        match self {
            CommandError::MissingDateTime => "❌ 날짜와 시간을 모두 입력해주세요.",
            CommandError::InvalidDateTime => "❌ 날짜와 시간 형식이 올바르지 않습니다.",
            CommandError::MissingContent => "❌ 일정 내용을 입력해주세요.",
            CommandError::Unsupported => "❌ 지원하지 않는 명령어입니다.",
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_message())
    }
}

impl std::error::Error for CommandError {}

impl ScheduleCommand {
    /// Build an add request from the form's separate date and time fields.
    ///
    /// Both fields are mandatory; they concatenate to `date"T"time` and must
    /// parse as a minute-granular local timestamp.
    pub fn add(
        content: &str,
        date: Option<&str>,
        time: Option<&str>,
    ) -> Result<Self, CommandError> {
        if content.trim().is_empty() {
            return Err(CommandError::MissingContent);
        }
        let (date, time) = match (date, time) {
            (Some(d), Some(t)) if !d.is_empty() && !t.is_empty() => (d, t),
            _ => return Err(CommandError::MissingDateTime),
        };

        let combined = format!("{date}T{time}");
        let start = NaiveDateTime::parse_from_str(&combined, "%Y-%m-%dT%H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(&combined, "%Y-%m-%dT%H:%M:%S"))
            .map_err(|_| CommandError::InvalidDateTime)?;

        Ok(ScheduleCommand::Add {
            content: content.trim().to_string(),
            start,
        })
    }

    pub fn remove(content: &str) -> Result<Self, CommandError> {
        if content.trim().is_empty() {
            return Err(CommandError::MissingContent);
        }
        Ok(ScheduleCommand::Remove {
            content: content.trim().to_string(),
        })
    }

    /// Parse a chat line: `add <date> <time> <content…>`, `remove <content…>`
    /// or `list`.
    pub fn parse_line(line: &str) -> Result<Self, CommandError> {
        let mut tokens = line.split_whitespace();
        let action = tokens.next().ok_or(CommandError::Unsupported)?;

        match action.to_ascii_lowercase().as_str() {
            "add" => {
                let date = tokens.next();
                let time = tokens.next();
                let content = tokens.collect::<Vec<_>>().join(" ");
                Self::add(&content, date, time)
            }
            "remove" => {
                let content = tokens.collect::<Vec<_>>().join(" ");
                Self::remove(&content)
            }
            "list" => Ok(ScheduleCommand::List),
            _ => Err(CommandError::Unsupported),
        }
    }
}
