//! Native window handle and its callback registration slots
//!
//! `HostWindow` is the per-window state owned by the host window system. It
//! behaves like a native windowing API: one callback slot per event kind,
//! `set_callback` hands back whatever was installed before, and delivering an
//! event updates native state before the slot's callback runs. The winit
//! bridge in `app` feeds real OS events into it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use super::event::{CursorMode, EventKind, NativeEvent};

/// Callback installed in a native slot
pub type NativeCallback = Rc<dyn Fn(&HostWindow, &NativeEvent)>;

type Slots = [Option<NativeCallback>; EventKind::COUNT];

/// Process-unique identifier of a native window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(u64);

impl WindowId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Native-side window state
#[derive(Debug, Clone)]
pub struct HostState {
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
    pub cursor_mode: CursorMode,
    pub cursor_pos: (f64, f64),
    pub should_close: bool,
}

/// A native window and its callback slots
pub struct HostWindow {
    id: WindowId,
    state: RefCell<HostState>,
    slots: RefCell<Slots>,
    destroyed: Cell<bool>,
}

impl HostWindow {
    /// Opens a native window
    ///
    /// Returns `None` when the host refuses the request (non-positive size).
    pub fn open(title: &str, width: i32, height: i32) -> Option<Rc<Self>> {
        if width <= 0 || height <= 0 {
            warn!(caller = "HostWindow::open", width, height, "refusing window with empty area");
            return None;
        }

        let window = Rc::new(Self {
            id: WindowId::next(),
            state: RefCell::new(HostState {
                title: title.to_string(),
                width,
                height,
                framebuffer_width: width,
                framebuffer_height: height,
                x: 0,
                y: 0,
                focused: false,
                iconified: false,
                maximized: false,
                content_scale: (1.0, 1.0),
                cursor_mode: CursorMode::Normal,
                cursor_pos: (0.0, 0.0),
                should_close: false,
            }),
            slots: RefCell::new(Slots::default()),
            destroyed: Cell::new(false),
        });

        debug!(caller = "HostWindow::open", id = ?window.id, title, width, height, "native window opened");
        Some(window)
    }

    /// Identifier of this window
    pub fn id(&self) -> WindowId {
        self.id
    }

    /// Installs `callback` in the slot for `kind`, returning the previous one
    pub fn set_callback(
        &self,
        kind: EventKind,
        callback: Option<NativeCallback>,
    ) -> Option<NativeCallback> {
        if self.destroyed.get() {
            return None;
        }
        std::mem::replace(&mut self.slots.borrow_mut()[kind.index()], callback)
    }

    /// Returns the callback currently installed for `kind`
    pub fn callback(&self, kind: EventKind) -> Option<NativeCallback> {
        self.slots.borrow()[kind.index()].clone()
    }

    /// Delivers an event: native state is updated first, then the slot runs
    ///
    /// No borrow is held while the callback runs, so callbacks may install
    /// other callbacks or change native state.
    pub fn deliver(&self, event: NativeEvent) {
        if self.destroyed.get() {
            return;
        }

        self.apply(&event);

        let callback = self.callback(event.kind());
        if let Some(callback) = callback {
            callback(self, &event);
        }
    }

    fn apply(&self, event: &NativeEvent) {
        let mut state = self.state.borrow_mut();
        match *event {
            NativeEvent::Size { width, height } => {
                state.width = width;
                state.height = height;
            }
            NativeEvent::FramebufferSize { width, height } => {
                state.framebuffer_width = width;
                state.framebuffer_height = height;
            }
            NativeEvent::Close => state.should_close = true,
            NativeEvent::Focus(focused) => state.focused = focused,
            NativeEvent::Iconify(iconified) => state.iconified = iconified,
            NativeEvent::Maximize(maximized) => state.maximized = maximized,
            NativeEvent::Position { x, y } => {
                state.x = x;
                state.y = y;
            }
            NativeEvent::ContentScale { x, y } => state.content_scale = (x, y),
            NativeEvent::CursorPosition { x, y } => state.cursor_pos = (x, y),
            NativeEvent::Refresh
            | NativeEvent::Key { .. }
            | NativeEvent::MouseButton { .. }
            | NativeEvent::CursorEnter(_)
            | NativeEvent::Scroll { .. } => {}
        }
    }

    /// Snapshot of native state
    pub fn state(&self) -> HostState {
        self.state.borrow().clone()
    }

    /// Current cursor mode
    pub fn cursor_mode(&self) -> CursorMode {
        self.state.borrow().cursor_mode
    }

    /// Requests a cursor mode
    pub fn set_cursor_mode(&self, mode: CursorMode) {
        self.state.borrow_mut().cursor_mode = mode;
    }

    /// Whether the close flag is set
    pub fn should_close(&self) -> bool {
        self.state.borrow().should_close
    }

    /// Sets or clears the close flag
    pub fn set_should_close(&self, value: bool) {
        self.state.borrow_mut().should_close = value;
    }

    /// Changes the window title
    pub fn set_title(&self, title: &str) {
        self.state.borrow_mut().title = title.to_string();
    }

    /// Whether the window has been destroyed
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    /// Destroys the native window, dropping every installed callback
    pub fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        // Dropped after the borrow ends; a callback's captures may own windows.
        let callbacks = std::mem::take(&mut *self.slots.borrow_mut());
        drop(callbacks);
        debug!(caller = "HostWindow::destroy", id = ?self.id, "native window destroyed");
    }
}

impl fmt::Debug for HostWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostWindow")
            .field("id", &self.id)
            .field("state", &self.state.borrow())
            .field("destroyed", &self.destroyed.get())
            .finish_non_exhaustive()
    }
}
