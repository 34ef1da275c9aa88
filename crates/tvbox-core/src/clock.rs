//! Wall clock pinned to a screen corner.

use chrono::NaiveDateTime;

use crate::settings::{ClockConfig, Corner, HourFormat};

/// Format the time of day per `config` (`"14:30"`, `"02:30:07 PM"`, ...).
pub fn format_time(config: &ClockConfig, now: &NaiveDateTime) -> String {
    let pattern = match (config.format, config.show_seconds) {
        (HourFormat::H24, false) => "%H:%M",
        (HourFormat::H24, true) => "%H:%M:%S",
        (HourFormat::H12, false) => "%I:%M %p",
        (HourFormat::H12, true) => "%I:%M:%S %p",
    };
    now.format(pattern).to_string()
}

/// Long-form date: `"Sunday, October 18, 2026"`.
pub fn format_date(now: &NaiveDateTime) -> String {
    now.format("%A, %B %-d, %Y").to_string()
}

/// What the clock shows right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockFace {
    pub corner: Corner,
    pub time: String,
    pub date: Option<String>,
}

impl ClockFace {
    pub fn new(config: &ClockConfig, now: &NaiveDateTime) -> Self {
        Self {
            corner: config.position,
            time: format_time(config, now),
            date: config.show_date.then(|| format_date(now)),
        }
    }
}

/// Cached face, refreshed on every tick.
#[derive(Debug, Clone, Default)]
pub struct ClockState {
    face: Option<ClockFace>,
}

impl ClockState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the face. Returns `true` if what is on screen changed
    /// (including the clock appearing or disappearing).
    pub fn tick(&mut self, config: &ClockConfig, now: &NaiveDateTime) -> bool {
        let next = config.enabled.then(|| ClockFace::new(config, now));
        if next == self.face {
            return false;
        }
        self.face = next;
        true
    }

    /// `None` while the clock is disabled.
    pub fn face(&self) -> Option<&ClockFace> {
        self.face.as_ref()
    }
}
