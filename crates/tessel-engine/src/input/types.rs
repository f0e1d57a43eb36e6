use std::fmt;

/// Keyboard key identifier.
///
/// Only keys the viewer can bind are named; everything else maps to
/// `Key::Unknown` with the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Period,
    Comma,

    // Modifiers as keys
    Shift,
    Control,
    Alt,
    Meta,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Period => f.write_str("."),
            Key::Comma => f.write_str(","),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Key transition, mirroring press / release / auto-repeat.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyAction {
    Press,
    Release,
    Repeat,
}

impl KeyAction {
    /// True for the initial press and for auto-repeats.
    #[inline]
    pub fn is_down(self) -> bool {
        matches!(self, KeyAction::Press | KeyAction::Repeat)
    }
}

/// Modifier keys state.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const SHIFT: u8 = 1;
    pub const CTRL: u8 = 2;
    pub const ALT: u8 = 4;
    pub const META: u8 = 8;

    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }

    /// Bitmask form (`SHIFT | CTRL | ALT | META`).
    pub fn bits(&self) -> u8 {
        (self.shift as u8 * Self::SHIFT)
            | (self.ctrl as u8 * Self::CTRL)
            | (self.alt as u8 * Self::ALT)
            | (self.meta as u8 * Self::META)
    }

    pub fn from_bits(bits: u8) -> Self {
        Self {
            shift: bits & Self::SHIFT != 0,
            ctrl: bits & Self::CTRL != 0,
            alt: bits & Self::ALT != 0,
            meta: bits & Self::META != 0,
        }
    }
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        action: KeyAction,
        modifiers: Modifiers,
        /// Stable platform code when available.
        code: u32,
    },

    /// Window focus change.
    Focused(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_round_trip() {
        for bits in 0..16u8 {
            assert_eq!(Modifiers::from_bits(bits).bits(), bits);
        }
    }

    #[test]
    fn shift_alone_is_one() {
        let m = Modifiers { shift: true, ..Default::default() };
        assert_eq!(m.bits(), Modifiers::SHIFT);
        assert!(m.any());
        assert!(!Modifiers::default().any());
    }

    #[test]
    fn repeat_counts_as_down() {
        assert!(KeyAction::Repeat.is_down());
        assert!(!KeyAction::Release.is_down());
    }

    #[test]
    fn punctuation_displays_as_symbol() {
        assert_eq!(Key::Period.to_string(), ".");
        assert_eq!(Key::L.to_string(), "L");
    }
}
