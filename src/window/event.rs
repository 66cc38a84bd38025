//! Native window events and their identifiers

/// Every kind of callback the native window system can deliver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Size,
    FramebufferSize,
    Close,
    Refresh,
    Focus,
    Iconify,
    Maximize,
    Position,
    ContentScale,
    Key,
    MouseButton,
    CursorPosition,
    CursorEnter,
    Scroll,
}

impl EventKind {
    /// Number of event kinds, i.e. callback slots per window
    pub const COUNT: usize = 14;

    /// All kinds in slot order
    pub const ALL: [EventKind; Self::COUNT] = [
        EventKind::Size,
        EventKind::FramebufferSize,
        EventKind::Close,
        EventKind::Refresh,
        EventKind::Focus,
        EventKind::Iconify,
        EventKind::Maximize,
        EventKind::Position,
        EventKind::ContentScale,
        EventKind::Key,
        EventKind::MouseButton,
        EventKind::CursorPosition,
        EventKind::CursorEnter,
        EventKind::Scroll,
    ];

    /// Kinds owned by the mouse when a camera takes over input
    pub const MOUSE: [EventKind; 3] = [
        EventKind::CursorPosition,
        EventKind::Scroll,
        EventKind::MouseButton,
    ];

    /// Kinds owned by the keyboard when a camera takes over input
    pub const KEYBOARD: [EventKind; 1] = [EventKind::Key];

    /// Slot index of this kind
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether the kind carries raw keyboard or mouse input
    pub fn is_input(self) -> bool {
        Self::MOUSE.contains(&self) || Self::KEYBOARD.contains(&self)
    }
}

/// Event payload as delivered by the native window system
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeEvent {
    Size { width: i32, height: i32 },
    FramebufferSize { width: i32, height: i32 },
    Close,
    Refresh,
    Focus(bool),
    Iconify(bool),
    Maximize(bool),
    Position { x: i32, y: i32 },
    ContentScale { x: f32, y: f32 },
    Key {
        key: Key,
        scancode: i32,
        action: Action,
        modifiers: Modifiers,
    },
    MouseButton {
        button: MouseButton,
        action: Action,
        modifiers: Modifiers,
    },
    CursorPosition { x: f64, y: f64 },
    CursorEnter(bool),
    Scroll { x: f64, y: f64 },
}

impl NativeEvent {
    /// The callback slot this event is delivered through
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Size { .. } => EventKind::Size,
            Self::FramebufferSize { .. } => EventKind::FramebufferSize,
            Self::Close => EventKind::Close,
            Self::Refresh => EventKind::Refresh,
            Self::Focus(_) => EventKind::Focus,
            Self::Iconify(_) => EventKind::Iconify,
            Self::Maximize(_) => EventKind::Maximize,
            Self::Position { .. } => EventKind::Position,
            Self::ContentScale { .. } => EventKind::ContentScale,
            Self::Key { .. } => EventKind::Key,
            Self::MouseButton { .. } => EventKind::MouseButton,
            Self::CursorPosition { .. } => EventKind::CursorPosition,
            Self::CursorEnter(_) => EventKind::CursorEnter,
            Self::Scroll { .. } => EventKind::Scroll,
        }
    }

    /// Shorthand for a key event without modifiers
    pub fn key(key: Key, action: Action) -> Self {
        Self::Key {
            key,
            scancode: 0,
            action,
            modifiers: Modifiers::default(),
        }
    }
}

/// Key and button transition reported by the native window system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Action {
    #[default]
    Release,
    Press,
    /// Held long enough for the OS to auto-repeat
    Repeat,
}

impl Action {
    /// Returns true for [`Action::Press`] and [`Action::Repeat`]
    pub fn is_down(self) -> bool {
        matches!(self, Self::Press | Self::Repeat)
    }
}

/// Keyboard modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Mouse button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Cursor behaviour requested from the native window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    #[default]
    Normal,
    Hidden,
    /// Hidden and locked to the window, reporting unbounded motion
    Disabled,
}

/// Physical key identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Enter,
    Escape,
    Backspace,
    Tab,

    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,

    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    Left,
    Right,
    Up,
    Down,

    LeftShift,
    RightShift,
    LeftControl,
    RightControl,
    LeftAlt,
    RightAlt,

    Other,
}

impl From<winit::keyboard::KeyCode> for Key {
    fn from(key: winit::keyboard::KeyCode) -> Self {
        use winit::keyboard::KeyCode as WK;
        match key {
            WK::Space => Self::Space,
            WK::Enter => Self::Enter,
            WK::Escape => Self::Escape,
            WK::Backspace => Self::Backspace,
            WK::Tab => Self::Tab,

            WK::KeyA => Self::A,
            WK::KeyB => Self::B,
            WK::KeyC => Self::C,
            WK::KeyD => Self::D,
            WK::KeyE => Self::E,
            WK::KeyF => Self::F,
            WK::KeyG => Self::G,
            WK::KeyH => Self::H,
            WK::KeyI => Self::I,
            WK::KeyJ => Self::J,
            WK::KeyK => Self::K,
            WK::KeyL => Self::L,
            WK::KeyM => Self::M,
            WK::KeyN => Self::N,
            WK::KeyO => Self::O,
            WK::KeyP => Self::P,
            WK::KeyQ => Self::Q,
            WK::KeyR => Self::R,
            WK::KeyS => Self::S,
            WK::KeyT => Self::T,
            WK::KeyU => Self::U,
            WK::KeyV => Self::V,
            WK::KeyW => Self::W,
            WK::KeyX => Self::X,
            WK::KeyY => Self::Y,
            WK::KeyZ => Self::Z,

            WK::Digit0 => Self::Num0,
            WK::Digit1 => Self::Num1,
            WK::Digit2 => Self::Num2,
            WK::Digit3 => Self::Num3,
            WK::Digit4 => Self::Num4,
            WK::Digit5 => Self::Num5,
            WK::Digit6 => Self::Num6,
            WK::Digit7 => Self::Num7,
            WK::Digit8 => Self::Num8,
            WK::Digit9 => Self::Num9,

            WK::F1 => Self::F1,
            WK::F2 => Self::F2,
            WK::F3 => Self::F3,
            WK::F4 => Self::F4,
            WK::F5 => Self::F5,
            WK::F6 => Self::F6,
            WK::F7 => Self::F7,
            WK::F8 => Self::F8,
            WK::F9 => Self::F9,
            WK::F10 => Self::F10,
            WK::F11 => Self::F11,
            WK::F12 => Self::F12,

            WK::ArrowLeft => Self::Left,
            WK::ArrowRight => Self::Right,
            WK::ArrowUp => Self::Up,
            WK::ArrowDown => Self::Down,

            WK::ShiftLeft => Self::LeftShift,
            WK::ShiftRight => Self::RightShift,
            WK::ControlLeft => Self::LeftControl,
            WK::ControlRight => Self::RightControl,
            WK::AltLeft => Self::LeftAlt,
            WK::AltRight => Self::RightAlt,

            _ => Self::Other,
        }
    }
}
