//! # Timer Service
//!
//! One-shot "run this job at time T" scheduling. The engine only depends on
//! the [`TimerService`] trait so tests can capture registered timers and fire
//! them deterministically; production wiring uses [`TokioTimerService`].
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

use chrono::{Local, NaiveDateTime};
use log::debug;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// A deferred unit of work, built at registration time and awaited when due.
pub type TimerJob = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// One-shot timer registration.
///
/// Runs `job` once, asynchronously, at or after `at` (interpreted in the
/// process-local zone). A past `at` runs as soon as possible. The job never
/// runs on the caller's stack.
pub trait TimerService: Send + Sync {
    fn schedule(&self, at: NaiveDateTime, job: TimerJob);
}

/// Timer service backed by the tokio runtime: one spawned task per
/// registration, sleeping until the due time.
#[derive(Default)]
pub struct TokioTimerService;

impl TokioTimerService {
    pub fn new() -> Self {
        TokioTimerService
    }
}

impl TimerService for TokioTimerService {
    fn schedule(&self, at: NaiveDateTime, job: TimerJob) {
        let now = Local::now().naive_local();
        let delay = (at - now).to_std().unwrap_or(Duration::ZERO);
        debug!("timer registered for {at} (fires in {delay:?})");

        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            job.await;
        });
    }
}
