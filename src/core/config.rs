//! # Configuration
//!
//! Environment-driven process configuration. Values come from the
//! environment (optionally populated from a `.env` file by the binary).
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{anyhow, ensure, Context, Result};

use crate::features::scheduling::DEFAULT_REMINDER_LEAD_MINUTES;

#[derive(Debug, Clone)]
pub struct Config {
    /// Incoming-webhook URL notifications are POSTed to.
    pub webhook_url: String,
    /// Default log filter when RUST_LOG is unset.
    pub log_level: String,
    /// Minutes before a schedule's start that the pre-reminder fires.
    pub reminder_lead_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let webhook_url = lookup("SLACK_WEBHOOK_URL")
            .ok_or_else(|| anyhow!("SLACK_WEBHOOK_URL must be set"))?;

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let reminder_lead_minutes = match lookup("REMINDER_LEAD_MINUTES") {
            Some(raw) => raw
                .parse::<i64>()
                .context("REMINDER_LEAD_MINUTES must be an integer")?,
            None => DEFAULT_REMINDER_LEAD_MINUTES,
        };
        ensure!(
            reminder_lead_minutes > 0,
            "REMINDER_LEAD_MINUTES must be positive"
        );

        Ok(Config {
            webhook_url,
            log_level,
            reminder_lead_minutes,
        })
    }
}
