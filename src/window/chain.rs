//! Forwarding to callbacks that were installed before us

use std::cell::{Cell, RefCell};

use super::event::{EventKind, NativeEvent};
use super::host::{HostWindow, NativeCallback};

/// Callbacks displaced when the adapter installed its own, one per kind
pub struct CallbackChain {
    previous: RefCell<[Option<NativeCallback>; EventKind::COUNT]>,
    enabled: Cell<bool>,
}

impl CallbackChain {
    /// Creates an empty chain with forwarding enabled
    pub fn new() -> Self {
        Self {
            previous: RefCell::new(Default::default()),
            enabled: Cell::new(true),
        }
    }

    /// Records the callback that was in the slot for `kind`
    pub fn record(&self, kind: EventKind, callback: Option<NativeCallback>) {
        self.previous.borrow_mut()[kind.index()] = callback;
    }

    /// Whether a previous callback exists for `kind`
    pub fn has_previous(&self, kind: EventKind) -> bool {
        self.previous.borrow()[kind.index()].is_some()
    }

    /// Removes and returns the recorded callback for `kind`
    pub fn take(&self, kind: EventKind) -> Option<NativeCallback> {
        self.previous.borrow_mut()[kind.index()].take()
    }

    /// Enables or disables forwarding
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    /// Whether forwarding is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Runs the previous callback for the event's kind, if forwarding applies
    ///
    /// Panics from the previous callback are not caught.
    pub fn invoke(&self, host: &HostWindow, event: &NativeEvent) {
        if !self.enabled.get() {
            return;
        }
        let previous = self.previous.borrow()[event.kind().index()].clone();
        if let Some(previous) = previous {
            previous(host, event);
        }
    }
}

impl Default for CallbackChain {
    fn default() -> Self {
        Self::new()
    }
}
