//! Capability wrapper around the host media element.
//!
//! The adapter owns at most one element at a time and installs a single
//! dispatcher as the element's event handler. Listeners are registered per
//! [`MediaEventKind`]; registering again for a kind replaces the previous
//! listener. Every call is a no-op while nothing is attached.

use bridge_traits::{MediaElement, MediaEvent, MediaEventHandler, MediaEventKind};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

type ListenerMap = HashMap<MediaEventKind, MediaEventHandler>;

pub struct ResourceAdapter {
    element: RwLock<Option<Arc<dyn MediaElement>>>,
    listeners: Arc<RwLock<ListenerMap>>,
}

impl ResourceAdapter {
    pub fn new() -> Self {
        Self {
            element: RwLock::new(None),
            listeners: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Attach `element`, detaching whatever was attached before.
    ///
    /// Listeners registered for the previous element are dropped.
    pub fn attach(&self, element: Arc<dyn MediaElement>) {
        self.detach();

        let listeners = Arc::downgrade(&self.listeners);
        let dispatcher: MediaEventHandler = Arc::new(move |event: MediaEvent| {
            let Some(listeners) = listeners.upgrade() else {
                return;
            };
            // Clone out so the listener may resubscribe while running
            let listener = listeners.read().get(&event.kind()).cloned();
            match listener {
                Some(listener) => listener(event),
                None => trace!(kind = %event.kind(), "No listener for element event"),
            }
        });

        element.set_event_handler(Some(dispatcher));
        *self.element.write() = Some(element);
        debug!("Media element attached");
    }

    /// Release the current element and every listener.
    pub fn detach(&self) {
        let previous = self.element.write().take();
        self.listeners.write().clear();

        if let Some(element) = previous {
            element.set_event_handler(None);
            debug!("Media element detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.element.read().is_some()
    }

    /// Register `listener` for `kind`, replacing any existing one.
    pub fn subscribe(&self, kind: MediaEventKind, listener: MediaEventHandler) {
        if !self.is_attached() {
            trace!(kind = %kind, "Ignoring subscription without an element");
            return;
        }
        self.listeners.write().insert(kind, listener);
    }

    pub fn unsubscribe(&self, kind: MediaEventKind) {
        self.listeners.write().remove(&kind);
    }

    /// Drop every listener but keep the element attached.
    pub fn clear(&self) {
        self.listeners.write().clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn play(&self) {
        if let Some(element) = self.element() {
            element.play();
        }
    }

    pub fn pause(&self) {
        if let Some(element) = self.element() {
            element.pause();
        }
    }

    pub fn seek_to(&self, position: f64) {
        if let Some(element) = self.element() {
            element.set_current_time(position);
        }
    }

    pub fn set_volume(&self, volume: f64) {
        if let Some(element) = self.element() {
            element.set_volume(volume);
        }
    }

    pub fn set_muted(&self, muted: bool) {
        if let Some(element) = self.element() {
            element.set_muted(muted);
        }
    }

    /// Duration already known to the element, if any.
    pub fn duration(&self) -> Option<f64> {
        self.element()?
            .duration()
            .filter(|d| d.is_finite() && *d >= 0.0)
    }

    // Never hold the slot lock while calling into the element: it may emit
    // events synchronously.
    fn element(&self) -> Option<Arc<dyn MediaElement>> {
        self.element.read().clone()
    }
}

impl Default for ResourceAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResourceAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceAdapter")
            .field("attached", &self.is_attached())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
