//! # Schedule Store
//!
//! In-memory store of pending schedules. Uses DashMap for thread-safe access:
//! timer callbacks mutate the store from background tasks concurrently with
//! foreground add/remove/list requests, and no caller ever takes a lock.
//!
//! Each entry owns a [`ScheduleGuard`], a shared cancellation token cloned
//! into every timer registered for that entry. Removing an entry cancels its
//! guard, so in-flight callbacks become no-ops instead of notifying for a
//! schedule that no longer exists.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Cancellation guards per entry, atomic insert_if_vacant
//! - 1.0.0: Initial concurrent key -> time mapping

use chrono::NaiveDateTime;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Minute-granular time format used in composite keys and listings.
pub const TIME_KEY_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Derive the composite store key for a (message, time) pair.
///
/// Identical pairs collide by construction; the store overwrites on collision.
pub fn schedule_key(message: &str, time: NaiveDateTime) -> String {
    format!("{}_{}", message, time.format(TIME_KEY_FORMAT))
}

/// Shared cancellation token for one schedule entry's timers.
///
/// Cloned into every timer callback registered for the entry; once cancelled
/// it never becomes active again.
#[derive(Clone, Debug)]
pub struct ScheduleGuard(Arc<AtomicBool>);

impl ScheduleGuard {
    pub fn new() -> Self {
        ScheduleGuard(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        !self.0.load(Ordering::SeqCst)
    }
}

impl Default for ScheduleGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// One pending schedule: the user's message, its start time, and the guard
/// covering every timer registered for it.
#[derive(Clone, Debug)]
pub struct ScheduleEntry {
    pub message: String,
    pub time: NaiveDateTime,
    pub guard: ScheduleGuard,
}

impl ScheduleEntry {
    pub fn new(message: impl Into<String>, time: NaiveDateTime) -> Self {
        ScheduleEntry {
            message: message.into(),
            time,
            guard: ScheduleGuard::new(),
        }
    }

    /// Composite key this entry is stored under.
    pub fn key(&self) -> String {
        schedule_key(&self.message, self.time)
    }
}

/// Concurrent map of composite key -> schedule entry.
#[derive(Default)]
pub struct ScheduleStore {
    entries: DashMap<String, ScheduleEntry>,
}

impl ScheduleStore {
    pub fn new() -> Self {
        ScheduleStore {
            entries: DashMap::new(),
        }
    }

    /// Insert an entry, silently overwriting any entry under the same key.
    ///
    /// The replaced entry's guard is cancelled so its timers go quiet.
    pub fn insert(&self, entry: ScheduleEntry) {
        if let Some(replaced) = self.entries.insert(entry.key(), entry) {
            replaced.guard.cancel();
        }
    }

    /// Atomically insert the entry only if its key is vacant.
    ///
    /// Returns whether the insert happened. This is the sole recurrence
    /// guard: the key encodes the occurrence time, so a duplicate occurrence
    /// can never slip in between a check and an insert.
    pub fn insert_if_vacant(&self, entry: ScheduleEntry) -> bool {
        match self.entries.entry(entry.key()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    /// Remove the entry stored under `key`, returning it if present.
    ///
    /// The caller decides whether to cancel the returned entry's guard.
    pub fn remove(&self, key: &str) -> Option<ScheduleEntry> {
        self.entries.remove(key).map(|(_, entry)| entry)
    }

    /// Remove every entry whose message matches `message` exactly.
    ///
    /// A recurring schedule has one entry per materialized occurrence, so
    /// this can remove more than one.
    pub fn remove_by_message(&self, message: &str) -> Vec<ScheduleEntry> {
        let keys: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.message == message)
            .map(|entry| entry.key().clone())
            .collect();

        keys.iter().filter_map(|key| self.remove(key)).collect()
    }

    /// Whether any stored entry starts exactly at `time`.
    pub fn contains_time(&self, time: NaiveDateTime) -> bool {
        self.entries.iter().any(|entry| entry.time == time)
    }

    /// Point-in-time copy of all entries, in no particular order.
    pub fn snapshot(&self) -> Vec<ScheduleEntry> {
        self.entries.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
