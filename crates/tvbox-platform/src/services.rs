//! Platform service traits and desktop implementation.

use chrono::NaiveDateTime;
use tvbox_types::error::Result;

// ---------------------------------------------------------------------------
// Time service
// ---------------------------------------------------------------------------

/// Abstraction over platform time services.
pub trait TimeService {
    /// Current local wall-clock time.
    fn now(&self) -> Result<NaiveDateTime>;

    /// Seconds since the process started.
    fn uptime_secs(&self) -> Result<u64>;
}

// ---------------------------------------------------------------------------
// Activation
// ---------------------------------------------------------------------------

/// A request to open something outside the launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launch {
    /// A platform intent URI (`intent://#Intent;...;end`).
    Intent(String),
    /// A URL to open in a new top-level browsing context.
    Url(String),
}

/// Opens tiles. Fire-and-forget: the launcher never waits for a result.
pub trait Activator {
    /// Hand an intent URI to the host OS.
    fn emit_intent(&mut self, uri: &str);

    /// Open `url` in a new browsing context.
    fn open_url(&mut self, url: &str);
}

// ---------------------------------------------------------------------------
// Toasts
// ---------------------------------------------------------------------------

/// A transient user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub body: String,
}

impl Toast {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Shows toasts.
pub trait Toaster {
    fn toast(&mut self, toast: Toast);
}

// ---------------------------------------------------------------------------
// Desktop implementation
// ---------------------------------------------------------------------------

/// Default platform implementation for desktop using `std` and `chrono`.
pub struct DesktopPlatform {
    start_time: std::time::Instant,
}

impl DesktopPlatform {
    pub fn new() -> Self {
        Self {
            start_time: std::time::Instant::now(),
        }
    }
}

impl Default for DesktopPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeService for DesktopPlatform {
    fn now(&self) -> Result<NaiveDateTime> {
        Ok(chrono::Local::now().naive_local())
    }

    fn uptime_secs(&self) -> Result<u64> {
        Ok(self.start_time.elapsed().as_secs())
    }
}

/// Desktop activator: there is no intent resolver on a desktop host, so
/// every launch is logged and kept for inspection.
#[derive(Debug, Default)]
pub struct LogActivator {
    pub launched: Vec<Launch>,
}

impl LogActivator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent launch, if any.
    pub fn last(&self) -> Option<&Launch> {
        self.launched.last()
    }
}

impl Activator for LogActivator {
    fn emit_intent(&mut self, uri: &str) {
        log::info!("Emitting intent {uri}");
        self.launched.push(Launch::Intent(uri.to_string()));
    }

    fn open_url(&mut self, url: &str) {
        log::info!("Opening {url} in a new context");
        self.launched.push(Launch::Url(url.to_string()));
    }
}

/// Desktop toaster: logs each toast and keeps the latest one for display.
#[derive(Debug, Default)]
pub struct LogToaster {
    current: Option<Toast>,
}

impl LogToaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// The toast currently on screen.
    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    /// Dismiss the current toast, returning it.
    pub fn dismiss(&mut self) -> Option<Toast> {
        self.current.take()
    }
}

impl Toaster for LogToaster {
    fn toast(&mut self, toast: Toast) {
        log::info!("Toast: {} -- {}", toast.title, toast.body);
        self.current = Some(toast);
    }
}
