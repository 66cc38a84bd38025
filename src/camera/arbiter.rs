//! Exclusive routing of raw input to one active camera

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use super::{InputScope, SharedCamera};
use crate::window::{CursorMode, EventKind, HostWindow, NativeCallback, NativeEvent};

#[derive(Default)]
struct ArbiterState {
    active: Option<SharedCamera>,
    mouse_held: bool,
    keyboard_held: bool,
    /// Slot contents replaced by our trampolines, restored on release
    displaced: HashMap<EventKind, Option<NativeCallback>>,
    /// Trampolines we installed, to tell our slots from reclaimed ones
    installed: HashMap<EventKind, NativeCallback>,
}

/// Decides which camera receives a window's raw input
///
/// At most one camera is active per window. Taking over while another camera
/// is active displaces it without complaint; the newest caller wins. The
/// trampolines installed in the native slots look the active camera up on
/// every event, so a displaced camera stops seeing input immediately.
pub struct CameraArbiter {
    host: Weak<HostWindow>,
    state: RefCell<ArbiterState>,
    this: Weak<CameraArbiter>,
}

impl CameraArbiter {
    /// Creates an arbiter for the given native window
    pub fn new(host: Weak<HostWindow>) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            host,
            state: RefCell::new(ArbiterState::default()),
            this: this.clone(),
        })
    }

    /// The camera currently receiving input
    pub fn active(&self) -> Option<SharedCamera> {
        self.state.borrow().active.clone()
    }

    /// Whether `camera` is the active camera
    pub fn is_active(&self, camera: &SharedCamera) -> bool {
        self.state
            .borrow()
            .active
            .as_ref()
            .is_some_and(|active| Rc::ptr_eq(active, camera))
    }

    /// Whether the mouse subset is currently taken over
    pub fn holds_mouse(&self) -> bool {
        self.state.borrow().mouse_held
    }

    /// Whether the keyboard subset is currently taken over
    pub fn holds_keyboard(&self) -> bool {
        self.state.borrow().keyboard_held
    }

    /// Routes all raw input to `camera`, capturing and hiding the cursor
    pub fn take_over_all(&self, camera: SharedCamera) {
        self.take_over(camera, InputScope::All);
    }

    /// Routes mouse input to `camera`, capturing and hiding the cursor
    pub fn take_over_mouse(&self, camera: SharedCamera) {
        self.take_over(camera, InputScope::Mouse);
    }

    /// Routes keyboard input to `camera`
    pub fn take_over_keyboard(&self, camera: SharedCamera) {
        self.take_over(camera, InputScope::Keyboard);
    }

    /// Stops routing input, restoring the cursor and displaced callbacks
    pub fn release_all(&self) {
        self.release(InputScope::All);
    }

    /// Stops routing mouse input
    pub fn release_mouse(&self) {
        self.release(InputScope::Mouse);
    }

    /// Stops routing keyboard input
    pub fn release_keyboard(&self) {
        self.release(InputScope::Keyboard);
    }

    fn take_over(&self, camera: SharedCamera, scope: InputScope) {
        let Some(host) = self.host.upgrade() else {
            warn!(caller = "CameraArbiter::take_over", "no native window to take over");
            return;
        };

        let previous = {
            let mut state = self.state.borrow_mut();
            let previous = state
                .active
                .replace(camera.clone())
                .filter(|previous| !Rc::ptr_eq(previous, &camera));

            if scope.includes_mouse() && !state.mouse_held {
                for kind in EventKind::MOUSE {
                    let trampoline = self.trampoline();
                    let displaced = host.set_callback(kind, Some(trampoline.clone()));
                    state.displaced.insert(kind, displaced);
                    state.installed.insert(kind, trampoline);
                }
                state.mouse_held = true;
            }
            if scope.includes_keyboard() && !state.keyboard_held {
                for kind in EventKind::KEYBOARD {
                    let trampoline = self.trampoline();
                    let displaced = host.set_callback(kind, Some(trampoline.clone()));
                    state.displaced.insert(kind, displaced);
                    state.installed.insert(kind, trampoline);
                }
                state.keyboard_held = true;
            }
            previous
        };

        if scope.includes_mouse() {
            host.set_cursor_mode(CursorMode::Disabled);
        }

        if let Some(previous) = previous {
            debug!(caller = "CameraArbiter::take_over", "displacing active camera");
            if let Ok(mut previous) = previous.try_borrow_mut() {
                previous.release_input(InputScope::All);
            }
        }

        match camera.try_borrow_mut() {
            Ok(mut camera) => {
                debug!(caller = "CameraArbiter::take_over", camera = camera.name(), ?scope, "input taken over");
                camera.acquire_input(scope);
            }
            Err(_) => warn!(caller = "CameraArbiter::take_over", "camera busy, input state not reset"),
        }
    }

    fn release(&self, scope: InputScope) {
        let host = self.host.upgrade();

        let (camera, restored) = {
            let mut state = self.state.borrow_mut();
            let mut restored = Vec::new();

            if scope.includes_mouse() && state.mouse_held {
                for kind in EventKind::MOUSE {
                    let ours = state.installed.remove(&kind);
                    restored.push((kind, ours, state.displaced.remove(&kind).flatten()));
                }
                state.mouse_held = false;
            }
            if scope.includes_keyboard() && state.keyboard_held {
                for kind in EventKind::KEYBOARD {
                    let ours = state.installed.remove(&kind);
                    restored.push((kind, ours, state.displaced.remove(&kind).flatten()));
                }
                state.keyboard_held = false;
            }

            if restored.is_empty() {
                return;
            }

            let camera = if state.mouse_held || state.keyboard_held {
                state.active.clone()
            } else {
                state.active.take()
            };
            (camera, restored)
        };

        if let Some(host) = host {
            for (kind, ours, callback) in restored {
                let still_ours = match (host.callback(kind), ours) {
                    (Some(current), Some(ours)) => Rc::ptr_eq(&current, &ours),
                    _ => false,
                };
                if still_ours {
                    host.set_callback(kind, callback);
                } else {
                    debug!(caller = "CameraArbiter::release", ?kind, "slot reclaimed by another callback, leaving it");
                }
            }
            if scope.includes_mouse() {
                host.set_cursor_mode(CursorMode::Normal);
            }
        }

        if let Some(camera) = camera
            && let Ok(mut camera) = camera.try_borrow_mut()
        {
            debug!(caller = "CameraArbiter::release", camera = camera.name(), ?scope, "input released");
            camera.release_input(scope);
        }
    }

    fn trampoline(&self) -> NativeCallback {
        let this = self.this.clone();
        Rc::new(move |_host: &HostWindow, event: &NativeEvent| {
            if let Some(arbiter) = this.upgrade() {
                arbiter.route(event);
            }
        })
    }

    /// Hands a raw input event to the active camera
    fn route(&self, event: &NativeEvent) {
        let Some(camera) = self.active() else {
            return;
        };
        let Ok(mut camera) = camera.try_borrow_mut() else {
            warn!(caller = "CameraArbiter::route", kind = ?event.kind(), "camera busy, dropping event");
            return;
        };

        match *event {
            NativeEvent::CursorPosition { x, y } => camera.handle_mouse_move(x, y),
            NativeEvent::Scroll { x, y } => camera.handle_scroll(x, y),
            NativeEvent::MouseButton { button, action, .. } => camera.handle_button(button, action),
            NativeEvent::Key { key, action, .. } => camera.handle_key(key, action),
            _ => {}
        }
    }
}
