//! Keystrokes as delivered to an edit line
//!
//! Logical key codes, not hardware scan codes. A keystroke that produces a
//! character carries it in `text`; the toolkit has already inserted that
//! character into the focused widget by the time the event reaches the engine.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Keyboard event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// The key that was pressed
    pub code: KeyCode,
    /// Modifier keys that were active
    pub modifiers: Modifiers,
    /// Event state (pressed, released, repeat)
    pub state: KeyState,
    /// Character produced by the keystroke, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<char>,
}

impl KeyEvent {
    /// Creates a new key event
    pub fn new(code: KeyCode, modifiers: Modifiers, state: KeyState) -> Self {
        Self {
            code,
            modifiers,
            state,
            text: None,
        }
    }

    /// Creates a key pressed event
    pub fn pressed(code: KeyCode, modifiers: Modifiers) -> Self {
        Self::new(code, modifiers, KeyState::Pressed)
    }

    /// Creates a key repeat event
    pub fn repeat(code: KeyCode, modifiers: Modifiers) -> Self {
        Self::new(code, modifiers, KeyState::Repeat)
    }

    /// Creates the pressed event for a typed character
    ///
    /// Upper-case letters carry Shift.
    pub fn typed(ch: char) -> Self {
        let modifiers = if ch.is_ascii_uppercase() {
            Modifiers::SHIFT
        } else {
            Modifiers::NONE
        };
        Self {
            code: KeyCode::from_char(ch),
            modifiers,
            state: KeyState::Pressed,
            text: Some(ch),
        }
    }

    /// Attaches the produced character
    pub fn with_text(mut self, ch: char) -> Self {
        self.text = Some(ch);
        self
    }

    /// Returns true if this is a press or auto-repeat
    pub fn is_down(&self) -> bool {
        matches!(self.state, KeyState::Pressed | KeyState::Repeat)
    }

    /// Returns true if the key is exactly `code` with exactly `modifiers`
    pub fn is(&self, code: KeyCode, modifiers: Modifiers) -> bool {
        self.code == code && self.modifiers == modifiers
    }

    /// Returns true if the keystroke produced an alphabetic character
    pub fn is_alphabetic(&self) -> bool {
        self.text.map(|ch| ch.is_alphabetic()).unwrap_or(false)
    }

    /// Returns true for keystrokes that change widget text
    pub fn is_editing(&self) -> bool {
        self.text.is_some() || matches!(self.code, KeyCode::Backspace | KeyCode::Delete)
    }
}

/// Key state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyState {
    /// Key was pressed down
    Pressed,
    /// Key was released
    Released,
    /// Key is auto-repeating
    Repeat,
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pressed => write!(f, "pressed"),
            Self::Released => write!(f, "released"),
            Self::Repeat => write!(f, "repeat"),
        }
    }
}

/// Key code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    // Letters
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

    // Numbers
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

    // Function keys
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

    // Special keys
    Escape,
    Tab,
    Space,
    Enter,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,

    // Arrow keys
    Up,
    Down,
    Left,
    Right,

    // Punctuation and symbols
    Minus,
    Equal,
    Comma,
    Period,
    Slash,

    /// Any other printable character; see `KeyEvent::text`
    Symbol,

    // Unknown/unmapped key
    Unknown,
}

impl KeyCode {
    /// Maps a typed character to its logical key
    pub fn from_char(ch: char) -> Self {
        const LETTERS: [KeyCode; 26] = [
            KeyCode::A,
            KeyCode::B,
            KeyCode::C,
            KeyCode::D,
            KeyCode::E,
            KeyCode::F,
            KeyCode::G,
            KeyCode::H,
            KeyCode::I,
            KeyCode::J,
            KeyCode::K,
            KeyCode::L,
            KeyCode::M,
            KeyCode::N,
            KeyCode::O,
            KeyCode::P,
            KeyCode::Q,
            KeyCode::R,
            KeyCode::S,
            KeyCode::T,
            KeyCode::U,
            KeyCode::V,
            KeyCode::W,
            KeyCode::X,
            KeyCode::Y,
            KeyCode::Z,
        ];
        const DIGITS: [KeyCode; 10] = [
            KeyCode::Num0,
            KeyCode::Num1,
            KeyCode::Num2,
            KeyCode::Num3,
            KeyCode::Num4,
            KeyCode::Num5,
            KeyCode::Num6,
            KeyCode::Num7,
            KeyCode::Num8,
            KeyCode::Num9,
        ];

        match ch {
            'a'..='z' => LETTERS[(ch as u8 - b'a') as usize],
            'A'..='Z' => LETTERS[(ch as u8 - b'A') as usize],
            '0'..='9' => DIGITS[(ch as u8 - b'0') as usize],
            ' ' => KeyCode::Space,
            '-' => KeyCode::Minus,
            '=' => KeyCode::Equal,
            ',' => KeyCode::Comma,
            '.' => KeyCode::Period,
            '/' => KeyCode::Slash,
            '\t' => KeyCode::Tab,
            '\r' | '\n' => KeyCode::Enter,
            c if c.is_control() => KeyCode::Unknown,
            _ => KeyCode::Symbol,
        }
    }

    /// Returns true for F1 to F12
    pub fn is_function_key(&self) -> bool {
        matches!(
            self,
            KeyCode::F1
                | KeyCode::F2
                | KeyCode::F3
                | KeyCode::F4
                | KeyCode::F5
                | KeyCode::F6
                | KeyCode::F7
                | KeyCode::F8
                | KeyCode::F9
                | KeyCode::F10
                | KeyCode::F11
                | KeyCode::F12
        )
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Modifier keys
///
/// Bitflags representing modifier key states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    /// No modifiers
    pub const NONE: Self = Self { bits: 0 };
    /// Control key
    pub const CTRL: Self = Self { bits: 1 << 0 };
    /// Alt key
    pub const ALT: Self = Self { bits: 1 << 1 };
    /// Shift key
    pub const SHIFT: Self = Self { bits: 1 << 2 };

    /// Creates a new modifier set with no modifiers
    pub fn none() -> Self {
        Self::NONE
    }

    /// Creates a new modifier set from bits
    pub fn from_bits(bits: u8) -> Self {
        Self { bits }
    }

    /// Returns the raw bits
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Adds a modifier
    pub fn with(mut self, other: Modifiers) -> Self {
        self.bits |= other.bits;
        self
    }

    /// Checks if a modifier is present
    pub fn contains(&self, other: Modifiers) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Checks if Ctrl is pressed
    pub fn is_ctrl(&self) -> bool {
        self.contains(Self::CTRL)
    }

    /// Checks if Alt is pressed
    pub fn is_alt(&self) -> bool {
        self.contains(Self::ALT)
    }

    /// Checks if Shift is pressed
    pub fn is_shift(&self) -> bool {
        self.contains(Self::SHIFT)
    }

    /// Returns true if no modifiers are pressed
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Parses a settings name: `ctrl`, `shift`, `alt` or `none`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Self::CTRL),
            "shift" => Some(Self::SHIFT),
            "alt" => Some(Self::ALT),
            "none" | "" => Some(Self::NONE),
            _ => None,
        }
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }

        let mut parts = Vec::new();
        if self.is_ctrl() {
            parts.push("Ctrl");
        }
        if self.is_alt() {
            parts.push("Alt");
        }
        if self.is_shift() {
            parts.push("Shift");
        }
        write!(f, "{}", parts.join("+"))
    }
}
