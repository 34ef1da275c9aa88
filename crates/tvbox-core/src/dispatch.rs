//! Key dispatch -- maps remote keys to navigation inputs.
//!
//! The mapping is fixed. Keys the launcher does not use pass through to the
//! host untouched, and Escape only means something while the admin panel is
//! open.

use crate::focus::NavInput;
use crate::input::Key;

/// What a key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Drive the focus machine.
    Nav(NavInput),
    /// Leave the admin panel.
    AdminExit,
    /// Not ours; the host keeps default handling.
    PassThrough,
}

impl Dispatch {
    /// Whether the host's default handling must be suppressed (so arrow keys
    /// do not also scroll the page).
    pub fn consumes_event(self) -> bool {
        !matches!(self, Self::PassThrough)
    }
}

/// Stateless key mapper.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher;

impl Dispatcher {
    pub fn new() -> Self {
        Self
    }

    pub fn dispatch(&self, key: &Key, admin_open: bool) -> Dispatch {
        match key {
            Key::ArrowLeft => Dispatch::Nav(NavInput::Left),
            Key::ArrowRight => Dispatch::Nav(NavInput::Right),
            Key::ArrowUp => Dispatch::Nav(NavInput::Up),
            Key::ArrowDown => Dispatch::Nav(NavInput::Down),
            Key::Enter => Dispatch::Nav(NavInput::Activate),
            Key::Escape if admin_open => Dispatch::AdminExit,
            Key::Escape | Key::Other(_) => Dispatch::PassThrough,
        }
    }
}
