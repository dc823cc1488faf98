//! Input events fed to the editor by the host window

use glam::Vec2;

use crate::selection::SelectionModifier;

/// Modifier keys held during an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    /// Box-select combination rule. Ctrl wins over Alt, Alt over Shift.
    pub fn selection_modifier(&self) -> SelectionModifier {
        if self.ctrl {
            SelectionModifier::Union
        } else if self.alt {
            SelectionModifier::Subtract
        } else if self.shift {
            SelectionModifier::Toggle
        } else {
            SelectionModifier::Replace
        }
    }
}

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Delete,
    /// Letter keys; matched case-insensitively
    Char(char),
}

/// Pointer positions are in physical pixels, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { position: Vec2, modifiers: Modifiers },
    PointerMove { position: Vec2, modifiers: Modifiers },
    PointerUp { position: Vec2, modifiers: Modifiers },
    Key { key: Key, modifiers: Modifiers },
}

/// Tool chosen from the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Insert,
    Cut,
}
