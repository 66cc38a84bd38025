//! Window wrapper and event dispatch
//!
//! A [`Window`] owns one native window and installs one trampoline per event
//! kind in its callback slots. Each native event flows through:
//!
//! ```text
//! HostWindow::deliver
//!        ↓
//!   trampoline ──► CallbackChain (callback installed before us, if any)
//!        ↓
//!   WindowState::apply
//!        ↓
//!   SubscriberRegistry::dispatch (insertion order)
//!        ↓
//!   InputModeController (focus events only)
//! ```
//!
//! Raw keyboard and mouse input reaches cameras through a separate channel:
//! see [`crate::camera::CameraArbiter`].

mod chain;
mod event;
mod host;
mod registry;
mod state;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, error, info};

use crate::camera::{CameraArbiter, InputModeController, SharedCamera};
use crate::context::ContextTracker;

pub use chain::CallbackChain;
pub use event::{Action, CursorMode, EventKind, Key, Modifiers, MouseButton, NativeEvent};
pub use host::{HostState, HostWindow, NativeCallback, WindowId};
pub use registry::{Handler, SubscriberRegistry, SubscriptionId};
pub use state::WindowState;

/// Adapter state shared with the installed trampolines
struct Adapter {
    state: Rc<RefCell<WindowState>>,
    chain: CallbackChain,
    subscribers: RefCell<SubscriberRegistry>,
    input_mode: InputModeController,
}

impl Adapter {
    fn dispatch(&self, host: &HostWindow, event: &NativeEvent) {
        self.chain.invoke(host, event);

        let kind = event.kind();
        self.state.borrow_mut().apply(event);

        // Handlers run on a copy so they can read the shared state freely
        let handlers = self.subscribers.borrow().snapshot(kind);
        if !handlers.is_empty() {
            let mut state = self.state.borrow().clone();
            SubscriberRegistry::dispatch(&handlers, &mut state);
            *self.state.borrow_mut() = state;
        }

        if let NativeEvent::Focus(focused) = *event {
            self.input_mode.on_focus(focused);
        }
    }
}

/// A native window plus the dispatch machinery around it
///
/// Dropping the window uninstalls its callbacks and destroys the native
/// window.
pub struct Window {
    host: Option<Rc<HostWindow>>,
    adapter: Rc<Adapter>,
    arbiter: Rc<CameraArbiter>,
    trampolines: Vec<(EventKind, NativeCallback)>,
}

impl Window {
    /// Opens a native window and installs the dispatch trampolines
    ///
    /// If the native window cannot be created the failure is logged and the
    /// returned wrapper has no handle; check [`Window::exists`] before use.
    pub fn new(title: &str, width: i32, height: i32) -> Self {
        match HostWindow::open(title, width, height) {
            Some(host) => Self::from_host(host),
            None => {
                error!(caller = "Window::new", title, width, height, "failed to create native window");
                Self::detached(WindowState::new(title, width, height))
            }
        }
    }

    /// Wraps an existing native window
    ///
    /// Callbacks already installed on `host` are recorded and, while chaining
    /// is enabled, run before this window's own dispatch.
    pub fn from_host(host: Rc<HostWindow>) -> Self {
        let native = host.state();
        let mut state = WindowState::new(&native.title, native.width, native.height);
        state.framebuffer_width = native.framebuffer_width;
        state.framebuffer_height = native.framebuffer_height;
        state.x = native.x;
        state.y = native.y;
        state.focused = native.focused;
        state.content_scale = native.content_scale;

        let arbiter = CameraArbiter::new(Rc::downgrade(&host));
        let mut window = Self {
            host: None,
            adapter: Self::adapter(state, arbiter.clone()),
            arbiter,
            trampolines: Vec::new(),
        };
        window.install(host);
        window
    }

    fn detached(state: WindowState) -> Self {
        let arbiter = CameraArbiter::new(std::rc::Weak::new());
        Self {
            host: None,
            adapter: Self::adapter(state, arbiter.clone()),
            arbiter,
            trampolines: Vec::new(),
        }
    }

    fn adapter(state: WindowState, arbiter: Rc<CameraArbiter>) -> Rc<Adapter> {
        Rc::new(Adapter {
            state: Rc::new(RefCell::new(state)),
            chain: CallbackChain::new(),
            subscribers: RefCell::new(SubscriberRegistry::new()),
            input_mode: InputModeController::new(arbiter),
        })
    }

    fn install(&mut self, host: Rc<HostWindow>) {
        for kind in EventKind::ALL {
            let adapter = Rc::downgrade(&self.adapter);
            let trampoline: NativeCallback =
                Rc::new(move |host: &HostWindow, event: &NativeEvent| {
                    if let Some(adapter) = adapter.upgrade() {
                        adapter.dispatch(host, event);
                    }
                });
            let previous = host.set_callback(kind, Some(trampoline.clone()));
            self.adapter.chain.record(kind, previous);
            if self.adapter.chain.has_previous(kind) {
                debug!(caller = "Window::install", ?kind, "chaining to previously installed callback");
            }
            self.trampolines.push((kind, trampoline));
        }
        info!(caller = "Window::install", id = ?host.id(), "window callbacks installed");
        self.host = Some(host);
    }

    /// Removes this window's trampolines from the native slots
    ///
    /// Input is released first. Slots that were since claimed by someone
    /// else are left alone. Keyboard and mouse subscribers are dropped.
    pub fn uninstall(&mut self) {
        self.arbiter.release_all();

        if let Some(host) = &self.host {
            for (kind, trampoline) in self.trampolines.drain(..) {
                if host
                    .callback(kind)
                    .is_some_and(|current| Rc::ptr_eq(&current, &trampoline))
                {
                    host.set_callback(kind, None);
                }
                self.adapter.chain.take(kind);
            }
        }
        self.trampolines.clear();

        let mut subscribers = self.adapter.subscribers.borrow_mut();
        for kind in EventKind::ALL.into_iter().filter(|kind| kind.is_input()) {
            subscribers.clear(kind);
        }
    }

    /// Whether a native window backs this wrapper
    pub fn exists(&self) -> bool {
        self.host.as_ref().is_some_and(|host| !host.is_destroyed())
    }

    /// The native window, if any
    pub fn host(&self) -> Option<&Rc<HostWindow>> {
        self.host.as_ref()
    }

    /// Native window identifier, if any
    pub fn id(&self) -> Option<WindowId> {
        self.host.as_ref().map(|host| host.id())
    }

    /// Feeds a native event into the window, as the host event loop would
    pub fn deliver(&self, event: NativeEvent) {
        if let Some(host) = &self.host {
            host.deliver(event);
        }
    }

    /// Copy of the current window state
    pub fn state(&self) -> WindowState {
        self.adapter.state.borrow().clone()
    }

    /// Shared handle to the window state, for objects bound to this window
    pub fn state_handle(&self) -> Rc<RefCell<WindowState>> {
        self.adapter.state.clone()
    }

    pub fn title(&self) -> String {
        self.adapter.state.borrow().title.clone()
    }

    /// Changes the title on both the native window and the exposed state
    pub fn set_title(&self, title: &str) {
        if let Some(host) = &self.host {
            host.set_title(title);
        }
        self.adapter.state.borrow_mut().title = title.to_string();
    }

    pub fn width(&self) -> i32 {
        self.adapter.state.borrow().width
    }

    pub fn height(&self) -> i32 {
        self.adapter.state.borrow().height
    }

    pub fn is_focused(&self) -> bool {
        self.adapter.state.borrow().focused
    }

    /// Whether a close was requested by the user or by [`Window::set_should_close`]
    pub fn should_close(&self) -> bool {
        self.host.as_ref().is_some_and(|host| host.should_close())
            || self.adapter.state.borrow().should_close
    }

    pub fn set_should_close(&self, value: bool) {
        if let Some(host) = &self.host {
            host.set_should_close(value);
        }
        self.adapter.state.borrow_mut().should_close = value;
    }

    /// Cursor mode currently requested from the native window
    pub fn cursor_mode(&self) -> CursorMode {
        self.host
            .as_ref()
            .map(|host| host.cursor_mode())
            .unwrap_or_default()
    }

    pub fn set_cursor_mode(&self, mode: CursorMode) {
        if let Some(host) = &self.host {
            host.set_cursor_mode(mode);
        }
    }

    /// Enables or disables forwarding to previously installed callbacks
    pub fn set_chaining(&self, enabled: bool) {
        self.adapter.chain.set_enabled(enabled);
    }

    pub fn chaining(&self) -> bool {
        self.adapter.chain.is_enabled()
    }

    /// Appends a subscriber for `kind`
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&mut WindowState) + 'static,
    {
        self.adapter.subscribers.borrow_mut().subscribe(kind, handler)
    }

    /// Removes a subscriber, returning whether it existed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.adapter.subscribers.borrow_mut().unsubscribe(id)
    }

    /// Number of subscribers for `kind`
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.adapter.subscribers.borrow().len(kind)
    }

    pub fn on_size<F>(&self, handler: F) -> SubscriptionId
    where
        F: FnMut(&mut WindowState) + 'static,
    {
        self.subscribe(EventKind::Size, handler)
    }

    pub fn on_framebuffer_size<F>(&self, handler: F) -> SubscriptionId
    where
        F: FnMut(&mut WindowState) + 'static,
    {
        self.subscribe(EventKind::FramebufferSize, handler)
    }

    pub fn on_focus<F>(&self, handler: F) -> SubscriptionId
    where
        F: FnMut(&mut WindowState) + 'static,
    {
        self.subscribe(EventKind::Focus, handler)
    }

    pub fn on_close<F>(&self, handler: F) -> SubscriptionId
    where
        F: FnMut(&mut WindowState) + 'static,
    {
        self.subscribe(EventKind::Close, handler)
    }

    pub fn on_key<F>(&self, handler: F) -> SubscriptionId
    where
        F: FnMut(&mut WindowState) + 'static,
    {
        self.subscribe(EventKind::Key, handler)
    }

    pub fn on_mouse_button<F>(&self, handler: F) -> SubscriptionId
    where
        F: FnMut(&mut WindowState) + 'static,
    {
        self.subscribe(EventKind::MouseButton, handler)
    }

    pub fn on_cursor_position<F>(&self, handler: F) -> SubscriptionId
    where
        F: FnMut(&mut WindowState) + 'static,
    {
        self.subscribe(EventKind::CursorPosition, handler)
    }

    pub fn on_scroll<F>(&self, handler: F) -> SubscriptionId
    where
        F: FnMut(&mut WindowState) + 'static,
    {
        self.subscribe(EventKind::Scroll, handler)
    }

    /// The arbiter deciding which camera receives this window's raw input
    pub fn arbiter(&self) -> Rc<CameraArbiter> {
        self.arbiter.clone()
    }

    /// Selects the camera that captures input whenever this window is focused
    pub fn designate_camera(&self, camera: SharedCamera) {
        let focused = self.is_focused();
        self.adapter.input_mode.designate(camera, focused);
    }

    /// The camera designated for this window
    pub fn designated_camera(&self) -> Option<SharedCamera> {
        self.adapter.input_mode.designated()
    }

    /// Makes this window's rendering context current on `tracker`
    pub fn make_context_current(&self, tracker: &ContextTracker) -> bool {
        match self.id() {
            Some(id) => {
                tracker.make_current(id);
                true
            }
            None => false,
        }
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        self.uninstall();
        if let Some(host) = self.host.take() {
            host.destroy();
        }
    }
}
