//! Cameras and the arbitration of raw input between them
//!
//! A window hands its low-level input slots to at most one camera at a time.
//! [`CameraArbiter`] records which camera that is and routes mouse, scroll
//! and keyboard events to it, while [`InputModeController`] ties the
//! take-over to the window's focus.
//!
//! ```text
//! HostWindow slots ──(take over)──► CameraArbiter ──► active dyn Camera
//!        ▲                                ▲
//!        └───── focus gain / loss ── InputModeController
//! ```

mod arbiter;
mod fly;
mod input_mode;

use std::cell::RefCell;
use std::rc::Rc;

use glam::Mat4;

use crate::window::{Action, Key, MouseButton};

pub use arbiter::CameraArbiter;
pub use fly::FlyCamera;
pub use input_mode::InputModeController;

/// Camera shared between its owner and the arbiter
pub type SharedCamera = Rc<RefCell<dyn Camera>>;

/// Which subset of raw input a take-over or release covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputScope {
    /// Cursor position, scroll and mouse buttons, plus the cursor mode
    Mouse,
    /// Key events
    Keyboard,
    /// Both subsets
    All,
}

impl InputScope {
    /// Whether the scope includes the mouse subset
    pub fn includes_mouse(self) -> bool {
        matches!(self, Self::Mouse | Self::All)
    }

    /// Whether the scope includes the keyboard subset
    pub fn includes_keyboard(self) -> bool {
        matches!(self, Self::Keyboard | Self::All)
    }
}

/// Capabilities every camera variant provides
pub trait Camera {
    /// Name used in logs
    fn name(&self) -> &str {
        "camera"
    }

    /// World-to-view transform
    fn view_matrix(&self) -> Mat4;

    /// View-to-clip transform; identity when the viewport has no area
    fn projection_matrix(&self) -> Mat4;

    /// Raw key transition
    fn handle_key(&mut self, key: Key, action: Action);

    /// Raw cursor position in window coordinates
    fn handle_mouse_move(&mut self, x: f64, y: f64);

    /// Raw scroll offset
    fn handle_scroll(&mut self, x: f64, y: f64);

    /// Raw mouse button transition
    fn handle_button(&mut self, button: MouseButton, action: Action);

    /// Advances the camera by `dt` seconds
    fn update(&mut self, dt: f32);

    /// Called when the camera starts receiving `scope`
    fn acquire_input(&mut self, scope: InputScope);

    /// Called when the camera stops receiving `scope`
    fn release_input(&mut self, scope: InputScope);
}
