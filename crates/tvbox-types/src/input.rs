//! Platform-agnostic input event types.
//!
//! Every host maps its native input to these enums. The launcher core never
//! sees raw platform input.

use serde::{Deserialize, Serialize};

/// A platform-agnostic input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key went down on the remote or keyboard.
    KeyDown(Key),
    /// The renderer reported a click on a tile (or on the banner, where
    /// `tile` is ignored).
    Click { section: usize, tile: usize },
    /// User requested quit (window close, end of input, etc.).
    Quit,
}

/// Keys the launcher distinguishes. Everything else is carried verbatim in
/// `Other` so the host can pass it through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Other(String),
}

impl Key {
    /// Parse a DOM-style key name (`"ArrowLeft"`, `"Enter"`, ...).
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "Enter" => Self::Enter,
            "Escape" => Self::Escape,
            other => Self::Other(other.to_string()),
        }
    }

    /// The DOM-style name of this key.
    pub fn name(&self) -> &str {
        match self {
            Self::ArrowLeft => "ArrowLeft",
            Self::ArrowRight => "ArrowRight",
            Self::ArrowUp => "ArrowUp",
            Self::ArrowDown => "ArrowDown",
            Self::Enter => "Enter",
            Self::Escape => "Escape",
            Self::Other(name) => name,
        }
    }
}
