//! # Notifications Feature
//!
//! Outbound notification transport.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod webhook;

pub use webhook::{Notifier, WebhookNotifier};
