//! winit platform bridge
//!
//! Creates the real window, feeds its events into a [`crate::window::Window`]
//! and drives a [`Scene`] once per loop iteration.

mod runner;
mod translate;
mod window;

pub use runner::{App, Scene};
pub use translate::EventTranslator;
pub use window::{apply_cursor_mode, window_attributes_from_config};
