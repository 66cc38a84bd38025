//! Tracking of the current rendering context

use std::sync::Mutex;

use tracing::trace;

use crate::window::WindowId;

/// Remembers which window's rendering context is current
///
/// Only the current-context pointer is guarded; nothing else in Coil is
/// synchronized.
#[derive(Debug, Default)]
pub struct ContextTracker {
    current: Mutex<Option<WindowId>>,
}

impl ContextTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `id` the current context, returning the one it replaced
    pub fn make_current(&self, id: WindowId) -> Option<WindowId> {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        trace!(caller = "ContextTracker::make_current", ?id, "switching context");
        current.replace(id)
    }

    /// Detaches any current context
    pub fn clear(&self) -> Option<WindowId> {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }

    /// The current context, if any
    pub fn current(&self) -> Option<WindowId> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether `id` is the current context
    pub fn is_current(&self, id: WindowId) -> bool {
        self.current() == Some(id)
    }
}
