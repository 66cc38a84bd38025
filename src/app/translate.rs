//! Conversion from winit events to native window events

use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{NativeKeyCode, PhysicalKey};

use crate::window::{Action, Key, Modifiers, MouseButton, NativeEvent};

/// Pixels per scroll line for touchpads that report pixel deltas
const PIXELS_PER_LINE: f64 = 20.0;

/// Turns winit window events into [`NativeEvent`]s
///
/// Positions and sizes are reported in logical units; framebuffer sizes stay
/// in physical pixels.
#[derive(Debug, Clone)]
pub struct EventTranslator {
    scale: f64,
    modifiers: Modifiers,
    virtual_cursor: (f64, f64),
}

impl EventTranslator {
    pub fn new(scale: f64) -> Self {
        Self {
            scale,
            modifiers: Modifiers::default(),
            virtual_cursor: (0.0, 0.0),
        }
    }

    /// Update scale factor (DPI scaling)
    pub fn set_scale(&mut self, scale: f64) {
        if scale > 0.0 {
            self.scale = scale;
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Modifier keys as of the last `ModifiersChanged`
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Translates a winit event; some winit events map to several native ones
    pub fn translate(&mut self, event: &WindowEvent) -> Vec<NativeEvent> {
        match event {
            WindowEvent::Resized(size) => {
                let logical = size.to_logical::<f64>(self.scale);
                vec![
                    NativeEvent::Size {
                        width: logical.width.round() as i32,
                        height: logical.height.round() as i32,
                    },
                    NativeEvent::FramebufferSize {
                        width: size.width as i32,
                        height: size.height as i32,
                    },
                ]
            }
            WindowEvent::Moved(position) => vec![NativeEvent::Position {
                x: position.x,
                y: position.y,
            }],
            WindowEvent::Focused(focused) => vec![NativeEvent::Focus(*focused)],
            WindowEvent::CloseRequested => vec![NativeEvent::Close],
            WindowEvent::RedrawRequested => vec![NativeEvent::Refresh],
            WindowEvent::Occluded(occluded) => vec![NativeEvent::Iconify(*occluded)],
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.set_scale(*scale_factor);
                let scale = *scale_factor as f32;
                vec![NativeEvent::ContentScale { x: scale, y: scale }]
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                let state = modifiers.state();
                self.modifiers = Modifiers {
                    shift: state.shift_key(),
                    ctrl: state.control_key(),
                    alt: state.alt_key(),
                    meta: state.super_key(),
                };
                Vec::new()
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let (key, scancode) = match event.physical_key {
                    PhysicalKey::Code(code) => (Key::from(code), 0),
                    PhysicalKey::Unidentified(native) => (Key::Other, native_scancode(native)),
                };
                let action = match (event.state, event.repeat) {
                    (ElementState::Pressed, true) => Action::Repeat,
                    (ElementState::Pressed, false) => Action::Press,
                    (ElementState::Released, _) => Action::Release,
                };
                vec![NativeEvent::Key {
                    key,
                    scancode,
                    action,
                    modifiers: self.modifiers,
                }]
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    winit::event::MouseButton::Left => MouseButton::Left,
                    winit::event::MouseButton::Right => MouseButton::Right,
                    winit::event::MouseButton::Middle => MouseButton::Middle,
                    winit::event::MouseButton::Back => MouseButton::Other(3),
                    winit::event::MouseButton::Forward => MouseButton::Other(4),
                    winit::event::MouseButton::Other(n) => MouseButton::Other(*n),
                };
                let action = if state.is_pressed() {
                    Action::Press
                } else {
                    Action::Release
                };
                vec![NativeEvent::MouseButton {
                    button,
                    action,
                    modifiers: self.modifiers,
                }]
            }
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(self.scale);
                self.virtual_cursor = (logical.x, logical.y);
                vec![NativeEvent::CursorPosition {
                    x: logical.x,
                    y: logical.y,
                }]
            }
            WindowEvent::CursorEntered { .. } => vec![NativeEvent::CursorEnter(true)],
            WindowEvent::CursorLeft { .. } => vec![NativeEvent::CursorEnter(false)],
            WindowEvent::MouseWheel { delta, .. } => {
                let (x, y) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (f64::from(*x), f64::from(*y)),
                    MouseScrollDelta::PixelDelta(pos) => {
                        (pos.x / PIXELS_PER_LINE, pos.y / PIXELS_PER_LINE)
                    }
                };
                vec![NativeEvent::Scroll { x, y }]
            }
            _ => Vec::new(),
        }
    }

    /// Advances the virtual cursor by a raw device delta
    ///
    /// A disabled cursor is locked in place, so pointer motion only arrives
    /// as device deltas; this turns them back into unbounded positions.
    pub fn motion(&mut self, dx: f64, dy: f64) -> NativeEvent {
        self.virtual_cursor.0 += dx;
        self.virtual_cursor.1 += dy;
        NativeEvent::CursorPosition {
            x: self.virtual_cursor.0,
            y: self.virtual_cursor.1,
        }
    }
}

impl Default for EventTranslator {
    fn default() -> Self {
        Self::new(1.0)
    }
}

fn native_scancode(native: NativeKeyCode) -> i32 {
    match native {
        NativeKeyCode::Xkb(code) => code as i32,
        NativeKeyCode::Windows(code) => i32::from(code),
        NativeKeyCode::MacOS(code) => i32::from(code),
        NativeKeyCode::Android(code) => code as i32,
        NativeKeyCode::Unidentified => -1,
    }
}
