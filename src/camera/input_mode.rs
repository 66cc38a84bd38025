//! Focus-driven input capture

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use super::{CameraArbiter, SharedCamera};

/// Keeps cursor capture in step with window focus
///
/// When the window gains focus its designated camera takes over all input;
/// when it loses focus input is released, so a background window never keeps
/// consuming input or holding the cursor.
pub struct InputModeController {
    arbiter: Rc<CameraArbiter>,
    designated: RefCell<Option<SharedCamera>>,
}

impl InputModeController {
    pub fn new(arbiter: Rc<CameraArbiter>) -> Self {
        Self {
            arbiter,
            designated: RefCell::new(None),
        }
    }

    /// The camera that takes over input whenever the window is focused
    pub fn designated(&self) -> Option<SharedCamera> {
        self.designated.borrow().clone()
    }

    /// Selects the window's camera; takes over right away if already focused
    pub fn designate(&self, camera: SharedCamera, focused: bool) {
        *self.designated.borrow_mut() = Some(camera.clone());
        if focused {
            self.arbiter.take_over_all(camera);
        }
    }

    /// Reacts to the window gaining or losing focus
    pub fn on_focus(&self, focused: bool) {
        if focused {
            let Some(camera) = self.designated() else {
                return;
            };
            debug!(caller = "InputModeController::on_focus", "focus gained, capturing input");
            // take_over_all also resets the camera's first-movement flag
            self.arbiter.take_over_all(camera);
        } else {
            debug!(caller = "InputModeController::on_focus", "focus lost, releasing input");
            self.arbiter.release_all();
        }
    }
}
