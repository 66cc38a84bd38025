//! Window state exposed to subscribers

use super::event::{Action, Key, MouseButton, NativeEvent};

/// Post-event view of a window, handed to subscribers
///
/// Subscribers read what changed here instead of receiving the raw native
/// payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowState {
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub framebuffer_width: i32,
    pub framebuffer_height: i32,
    pub x: i32,
    pub y: i32,
    pub focused: bool,
    pub iconified: bool,
    pub maximized: bool,
    pub content_scale: (f32, f32),
    pub should_close: bool,
    /// Last reported cursor position in window coordinates
    pub cursor: (f64, f64),
    /// Whether the cursor is inside the content area
    pub cursor_inside: bool,
    pub last_key: Option<(Key, Action)>,
    pub last_button: Option<(MouseButton, Action)>,
    /// Scroll offset of the most recent scroll event
    pub last_scroll: (f64, f64),
    /// Number of refresh requests seen
    pub refresh_count: u64,
}

impl WindowState {
    /// Creates state for a freshly opened window
    pub fn new(title: &str, width: i32, height: i32) -> Self {
        Self {
            title: title.to_string(),
            width,
            height,
            framebuffer_width: width,
            framebuffer_height: height,
            content_scale: (1.0, 1.0),
            ..Self::default()
        }
    }

    /// Width over height, or `None` when either side is non-positive
    pub fn aspect_ratio(&self) -> Option<f32> {
        (self.width > 0 && self.height > 0).then(|| self.width as f32 / self.height as f32)
    }

    /// Folds a native event into the state
    pub fn apply(&mut self, event: &NativeEvent) {
        match *event {
            NativeEvent::Size { width, height } => {
                self.width = width;
                self.height = height;
            }
            NativeEvent::FramebufferSize { width, height } => {
                self.framebuffer_width = width;
                self.framebuffer_height = height;
            }
            NativeEvent::Close => self.should_close = true,
            NativeEvent::Refresh => self.refresh_count += 1,
            NativeEvent::Focus(focused) => self.focused = focused,
            NativeEvent::Iconify(iconified) => self.iconified = iconified,
            NativeEvent::Maximize(maximized) => self.maximized = maximized,
            NativeEvent::Position { x, y } => {
                self.x = x;
                self.y = y;
            }
            NativeEvent::ContentScale { x, y } => self.content_scale = (x, y),
            NativeEvent::Key { key, action, .. } => self.last_key = Some((key, action)),
            NativeEvent::MouseButton { button, action, .. } => {
                self.last_button = Some((button, action))
            }
            NativeEvent::CursorPosition { x, y } => self.cursor = (x, y),
            NativeEvent::CursorEnter(entered) => self.cursor_inside = entered,
            NativeEvent::Scroll { x, y } => self.last_scroll = (x, y),
        }
    }
}
