//! # Feature: Webhook Notifications
//!
//! Fire-and-forget delivery of plain-text messages to the chat channel's
//! incoming webhook. POSTs `{"text": …}` as JSON with a bounded request
//! timeout so a slow endpoint cannot tie up a timer task. Delivery failures
//! are logged and swallowed, never retried, never surfaced to the scheduler.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, warn};
use serde::Serialize;
use std::time::Duration;

/// Bounded per-request timeout for webhook delivery.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Best-effort outbound text channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `text`; failures are the implementation's problem, not the
    /// caller's.
    async fn send(&self, text: &str);
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

/// Notifier posting to a chat incoming-webhook URL.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: &str) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?;
        Ok(WebhookNotifier {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, text: &str) {
        let payload = WebhookPayload { text };
        match self.client.post(&self.url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("delivered notification ({} bytes)", text.len());
            }
            Ok(response) => {
                warn!("webhook rejected notification: {}", response.status());
            }
            Err(e) => {
                warn!("failed to deliver notification: {e}");
            }
        }
    }
}
