//! Keyboard, pointer and focus state handed to the editor skins.
//!
//! The dispatcher that owns the platform connection keeps one [`InputState`]
//! and updates it as native events arrive. Every skin handler receives it by
//! reference, so skins never consult process-wide state to learn which
//! modifiers or buttons are held.

use crate::geometry::Point;

/// Keyboard modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held (Windows key, Cmd on macOS).
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// Alt modifier only.
    pub const ALT: Self = Self {
        shift: false,
        control: false,
        alt: true,
        meta: false,
    };

    /// Meta modifier only.
    pub const META: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: true,
    };

    /// The platform's command modifier alone: Cmd on macOS, Control elsewhere.
    pub const COMMAND: Self = if cfg!(target_os = "macos") {
        Self::META
    } else {
        Self::CTRL
    };

    /// The platform's word-navigation modifier alone: Option on macOS,
    /// Control elsewhere.
    pub const WORD: Self = if cfg!(target_os = "macos") {
        Self::ALT
    } else {
        Self::CTRL
    };

    /// Combine with Shift.
    pub const fn with_shift(self) -> Self {
        Self { shift: true, ..self }
    }

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }

    /// Whether the platform command modifier is held.
    pub fn command(&self) -> bool {
        if cfg!(target_os = "macos") {
            self.meta
        } else {
            self.control
        }
    }

    /// Whether the platform word-navigation modifier is held.
    pub fn word(&self) -> bool {
        if cfg!(target_os = "macos") {
            self.alt
        } else {
            self.control
        }
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (usually left).
    Left,
    /// Secondary button (usually right).
    Right,
    /// Middle button (scroll wheel click).
    Middle,
}

/// The set of mouse buttons currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseButtons {
    pub left: bool,
    pub right: bool,
    pub middle: bool,
}

impl MouseButtons {
    /// Whether `button` is held.
    pub fn is_pressed(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Left => self.left,
            MouseButton::Right => self.right,
            MouseButton::Middle => self.middle,
        }
    }

    fn set(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.left = pressed,
            MouseButton::Right => self.right = pressed,
            MouseButton::Middle => self.middle = pressed,
        }
    }
}

/// Keyboard keys the editor skins react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
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

    // Navigation
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,

    // Editing
    Backspace,
    Delete,
    Insert,
    Enter,
    Tab,
    Escape,

    // Whitespace
    Space,
}

/// Keyboard and pointer state maintained by the event dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    /// Modifiers currently held.
    pub modifiers: KeyboardModifiers,
    /// Mouse buttons currently held.
    pub buttons: MouseButtons,
    /// Last known pointer position in the coordinates of the receiving skin.
    pub pointer: Option<Point>,
}

impl InputState {
    /// Create a state with nothing held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state with the given modifiers held.
    pub fn with_modifiers(modifiers: KeyboardModifiers) -> Self {
        Self {
            modifiers,
            ..Self::default()
        }
    }

    /// Record a button press at `pointer`.
    pub fn press(&mut self, button: MouseButton, pointer: Point) {
        self.buttons.set(button, true);
        self.pointer = Some(pointer);
    }

    /// Record a button release at `pointer`.
    pub fn release(&mut self, button: MouseButton, pointer: Point) {
        self.buttons.set(button, false);
        self.pointer = Some(pointer);
    }

    /// Record pointer motion.
    pub fn move_to(&mut self, pointer: Point) {
        self.pointer = Some(pointer);
    }

    /// Whether Shift is held.
    pub fn shift(&self) -> bool {
        self.modifiers.shift
    }

    /// Whether the left button is held.
    pub fn left_button(&self) -> bool {
        self.buttons.left
    }
}

/// Describes a focus transition reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    /// Whether focus moved for good rather than temporarily (for example to a
    /// popup menu).
    pub permanent: bool,
    /// Whether the other party of the transition lives in the same window.
    pub same_window: bool,
}

impl FocusChange {
    /// A permanent transfer within one window, such as a click or TAB.
    pub const PERMANENT: Self = Self {
        permanent: true,
        same_window: true,
    };

    /// A temporary transfer, such as opening a popup.
    pub const TEMPORARY: Self = Self {
        permanent: false,
        same_window: true,
    };

    /// Focus moved to or from another window.
    pub const OTHER_WINDOW: Self = Self {
        permanent: true,
        same_window: false,
    };

    /// Whether this transfer should select all text in a single-line field
    /// (permanent, within the same window).
    pub fn is_local_permanent(&self) -> bool {
        self.permanent && self.same_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_modifiers() {
        assert!(KeyboardModifiers::COMMAND.command());
        assert!(KeyboardModifiers::WORD.word());
        assert!(KeyboardModifiers::WORD.with_shift().shift);
        assert!(!KeyboardModifiers::SHIFT.command());
        assert!(!KeyboardModifiers::NONE.any());
    }

    #[test]
    fn test_button_tracking() {
        let mut input = InputState::new();
        input.press(MouseButton::Left, Point::new(3.0, 4.0));
        assert!(input.left_button());
        assert!(input.buttons.is_pressed(MouseButton::Left));
        assert!(!input.buttons.is_pressed(MouseButton::Right));

        input.release(MouseButton::Left, Point::new(5.0, 4.0));
        assert!(!input.left_button());
        assert_eq!(input.pointer, Some(Point::new(5.0, 4.0)));
    }
}
