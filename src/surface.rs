//! Edit-surface contract.
//!
//! The edit surface is the live UI-facing object representing "the form
//! currently being edited": it holds the model and raises the two events the
//! bridge reacts to. Integration is by message passing: the surface fans
//! events out over channels and the binding consumes them.

use crate::model::ModelRef;
use std::sync::{Mutex, RwLock};
use tokio::sync::mpsc;

/// An event raised by an edit surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The host requested a full-model validation.
    ValidationRequested,
    /// A single field's value changed. Carries the field's property path
    /// relative to the model root, e.g. `Address.City`.
    FieldChanged(String),
}

/// The form currently being edited, as seen by the bridge.
pub trait EditSurface: Send + Sync {
    /// The model under edit, if one is loaded.
    fn model(&self) -> Option<ModelRef>;

    /// Opens a new event subscription. Each call returns an independent
    /// channel receiving every subsequent [`SurfaceEvent`]. Subscriptions
    /// are never revoked; they live until the receiver is dropped.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<SurfaceEvent>;
}

/// Channel-fanout [`EditSurface`] implementation.
///
/// Hosts call [`request_validation`](FormSurface::request_validation) and
/// [`notify_field_changed`](FormSurface::notify_field_changed) from their UI
/// layer; every subscriber receives every event in order.
#[derive(Default)]
pub struct FormSurface {
    model: RwLock<Option<ModelRef>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<SurfaceEvent>>>,
}

impl FormSurface {
    /// Creates a surface with no model loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a surface editing the given model.
    #[must_use]
    pub fn with_model(model: ModelRef) -> Self {
        Self {
            model: RwLock::new(Some(model)),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Replaces (or clears) the model under edit.
    pub fn set_model(&self, model: Option<ModelRef>) {
        *self.model.write().unwrap() = model;
    }

    /// Raises a full-model validation request.
    pub fn request_validation(&self) {
        self.broadcast(SurfaceEvent::ValidationRequested);
    }

    /// Raises a field-changed event for the given property path.
    pub fn notify_field_changed(&self, path: impl Into<String>) {
        self.broadcast(SurfaceEvent::FieldChanged(path.into()));
    }

    fn broadcast(&self, event: SurfaceEvent) {
        // Closed subscriptions are pruned as a side effect of sending.
        self.subscribers
            .lock()
            .unwrap()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl EditSurface for FormSurface {
    fn model(&self) -> Option<ModelRef> {
        self.model.read().unwrap().clone()
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<SurfaceEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().push(tx);
        rx
    }
}
