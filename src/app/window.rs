//! Native window creation and cursor control

use tracing::warn;
use winit::dpi::LogicalSize;
use winit::window::{CursorGrabMode, Fullscreen, Window as NativeWindow, WindowAttributes};

use crate::config::WindowConfig;
use crate::window::CursorMode;

/// Creates window attributes from configuration
pub fn window_attributes_from_config(config: &WindowConfig) -> WindowAttributes {
    let mut attrs = WindowAttributes::default()
        .with_title(config.title.clone())
        .with_inner_size(LogicalSize::new(config.width.max(1), config.height.max(1)))
        .with_resizable(config.resizable)
        .with_decorations(config.decorated);

    if config.fullscreen {
        attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }

    attrs
}

/// Applies a cursor mode to the real window
///
/// `Disabled` prefers a locked cursor and falls back to confinement on
/// platforms that cannot lock.
pub fn apply_cursor_mode(window: &NativeWindow, mode: CursorMode) {
    let grab = match mode {
        CursorMode::Normal | CursorMode::Hidden => window.set_cursor_grab(CursorGrabMode::None),
        CursorMode::Disabled => window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined)),
    };
    if let Err(e) = grab {
        warn!(caller = "apply_cursor_mode", ?mode, error = %e, "cursor grab not supported");
    }
    window.set_cursor_visible(mode == CursorMode::Normal);
}
