//! Field error store contract.
//!
//! The store holds per-field error messages keyed by [`FieldLocation`] and is
//! the sole externally visible side-effect surface of the bridge. Its
//! contents are owned by the edit surface, not by the bridge.

use crate::model::FieldLocation;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-field error message store, keyed by (owner object, property name).
pub trait FieldErrorStore: Send + Sync {
    /// Removes every message in the store.
    fn clear_all(&self);

    /// Removes the messages at exactly this location.
    fn clear_field(&self, location: &FieldLocation);

    /// Appends a message at the given location.
    fn add_message(&self, location: &FieldLocation, message: &str);

    /// Signals the edit surface that the error state changed.
    fn notify_changed(&self);
}

/// In-memory [`FieldErrorStore`] backed by a hash map.
///
/// The standard store for hosts without their own error state, and the store
/// the crate's tests observe. Counts change notifications so ordering
/// guarantees can be asserted.
#[derive(Default)]
pub struct InMemoryErrorStore {
    messages: Mutex<HashMap<FieldLocation, Vec<String>>>,
    notifications: AtomicUsize,
}

impl InMemoryErrorStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages currently stored at the given location.
    pub fn messages_for(&self, location: &FieldLocation) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .get(location)
            .cloned()
            .unwrap_or_default()
    }

    /// Total number of messages across all locations.
    pub fn message_count(&self) -> usize {
        self.messages.lock().unwrap().values().map(Vec::len).sum()
    }

    /// Whether the store holds no messages.
    pub fn is_empty(&self) -> bool {
        self.message_count() == 0
    }

    /// How many times `notify_changed` has fired.
    pub fn notification_count(&self) -> usize {
        self.notifications.load(Ordering::SeqCst)
    }
}

impl FieldErrorStore for InMemoryErrorStore {
    fn clear_all(&self) {
        self.messages.lock().unwrap().clear();
    }

    fn clear_field(&self, location: &FieldLocation) {
        self.messages.lock().unwrap().remove(location);
    }

    fn add_message(&self, location: &FieldLocation, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .entry(location.clone())
            .or_default()
            .push(message.to_string());
    }

    fn notify_changed(&self) {
        self.notifications.fetch_add(1, Ordering::SeqCst);
    }
}
