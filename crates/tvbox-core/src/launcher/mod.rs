//! The home surface: settings, view, focus and the admin session in one
//! event-loop-owned struct.
//!
//! All state changes happen on the caller's thread, one input at a time.
//! Every settings write rebuilds the view, re-seats the focus cursor and
//! republishes the theme before the next input is handled.

#[cfg(test)]
mod tests;

use chrono::NaiveDateTime;

use crate::activation::{self, Host};
use crate::admin::{AdminPanel, AdminSession};
use crate::clock::{ClockFace, ClockState};
use crate::dispatch::{Dispatch, Dispatcher};
use crate::error::{Result, TvboxError};
use crate::focus::{Cursor, FocusMachine, FocusTarget, Transition};
use crate::icons::IconRegistry;
use crate::input::Key;
use crate::music::Previewer;
use crate::platform::{AudioSink, HandleRegistry, MediaHandles, SettingsStore};
use crate::render::{self, Renderer};
use crate::section::{self, GridColumns, View};
use crate::settings::{Configuration, SettingsHub, SettingsUpdate};
use crate::theme::{self, StyleVars};

pub struct Launcher {
    hub: SettingsHub,
    view: View,
    focus: FocusMachine,
    dispatcher: Dispatcher,
    session: AdminSession,
    clock: ClockState,
    style: StyleVars,
    icons: IconRegistry,
    previewer: Previewer,
    handles: HandleRegistry,
    columns: GridColumns,
}

impl Launcher {
    /// Load settings from `store` and build the first view.
    pub fn new(store: Box<dyn SettingsStore>, columns: GridColumns) -> Self {
        let hub = SettingsHub::load(store);
        let view = section::materialize_with(hub.get(), columns);
        let focus = FocusMachine::new(&view);
        let mut style = StyleVars::new();
        theme::publish(hub.get(), &mut style);
        // Tracks saved by earlier runs keep their (now dead) handle URLs;
        // new imports must not be issued the same ones.
        let mut handles = HandleRegistry::new();
        handles.resume_after(hub.get().apps.local_music.iter().map(|t| t.url.as_str()));
        log::info!(
            "Launcher ready: {} sections, focus at {:?}",
            view.len(),
            focus.cursor()
        );
        Self {
            hub,
            view,
            focus,
            dispatcher: Dispatcher::new(),
            session: AdminSession::new(),
            clock: ClockState::new(),
            style,
            icons: IconRegistry::new(),
            previewer: Previewer::new(),
            handles,
            columns,
        }
    }

    pub fn settings(&self) -> &Configuration {
        self.hub.get()
    }

    /// Incremented on every settings write.
    pub fn revision(&self) -> u64 {
        self.hub.revision()
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn cursor(&self) -> Option<Cursor> {
        self.focus.cursor()
    }

    pub fn focused(&self) -> Option<FocusTarget<'_>> {
        self.focus.focused(&self.view)
    }

    pub fn is_admin(&self) -> bool {
        self.session.is_open()
    }

    pub fn style(&self) -> &StyleVars {
        &self.style
    }

    pub fn clock_face(&self) -> Option<&ClockFace> {
        self.clock.face()
    }

    pub fn icons(&self) -> &IconRegistry {
        &self.icons
    }

    pub fn previewer(&self) -> &Previewer {
        &self.previewer
    }

    // -- Input --

    /// Handle one key. Returns `true` if the key was consumed (the host
    /// must suppress its default action).
    pub fn handle_key(&mut self, key: &Key, host: &mut Host<'_>) -> bool {
        let dispatch = self.dispatcher.dispatch(key, self.session.is_open());
        match dispatch {
            Dispatch::Nav(input) => match self.focus.apply(&self.view, input) {
                Transition::Activate(_) => {
                    self.activate_focused(host);
                },
                Transition::Moved { from, to } => {
                    log::trace!("focus {from:?} -> {to:?}");
                },
                Transition::Stayed(_) | Transition::Unfocusable => {},
            },
            Dispatch::AdminExit => self.logout(),
            Dispatch::PassThrough => {
                log::trace!("key {} passed through", key.name());
            },
        }
        dispatch.consumes_event()
    }

    /// Pointer activation: focus the clicked element and activate it.
    /// On the banner `tile` is ignored.
    pub fn click(&mut self, section: usize, tile: usize, host: &mut Host<'_>) -> bool {
        if !self.focus.set_cursor(&self.view, Cursor::new(section, tile)) {
            log::debug!("click at ({section}, {tile}) hit nothing");
            return false;
        }
        self.activate_focused(host)
    }

    fn activate_focused(&self, host: &mut Host<'_>) -> bool {
        match self.focus.focused(&self.view) {
            Some(FocusTarget::Banner(banner)) => activation::activate_banner(banner, host),
            Some(FocusTarget::Tile { tile, .. }) => activation::activate_tile(tile, host),
            None => false,
        }
    }

    // -- Settings --

    /// Publish one settings group, then rebuild the view around it.
    pub fn update_settings(&mut self, update: SettingsUpdate) {
        self.hub.update(update);
        self.refresh();
    }

    /// Change the grid column counts.
    pub fn set_columns(&mut self, columns: GridColumns) {
        self.columns = columns;
        self.refresh();
    }

    fn refresh(&mut self) {
        let next = section::materialize_with(self.hub.get(), self.columns);
        self.focus.revalidate(&self.view, &next);
        self.view = next;
        theme::publish(self.hub.get(), &mut self.style);
    }

    // -- Admin --

    pub fn login(&mut self, password: &str) -> Result<()> {
        self.session.login(self.hub.get(), password)
    }

    pub fn logout(&mut self) {
        self.session.logout();
    }

    /// Run one admin edit against the current settings and publish it.
    pub fn admin<F>(&mut self, edit: F) -> Result<()>
    where
        F: FnOnce(&AdminPanel<'_>, &mut dyn MediaHandles) -> Result<SettingsUpdate>,
    {
        let snapshot = self.hub.snapshot();
        let panel = AdminPanel::new(&self.session, &snapshot);
        let update = edit(&panel, &mut self.handles)?;
        self.update_settings(update);
        Ok(())
    }

    /// Remove a local track, stopping it first if it is playing.
    pub fn remove_track(&mut self, id: &str, sink: &mut dyn AudioSink) -> Result<()> {
        if !self.session.is_open() {
            return Err(TvboxError::AdminRequired);
        }
        self.previewer.forget(id, sink);
        self.admin(|panel, handles| panel.remove_track(id, handles))
    }

    /// Play or pause a local track. Returns whether it is now playing.
    pub fn preview(&mut self, id: &str, sink: &mut dyn AudioSink) -> Result<bool> {
        if !self.session.is_open() {
            return Err(TvboxError::AdminRequired);
        }
        let config = self.hub.get();
        let track = config
            .apps
            .local_music
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| TvboxError::UnknownTrack(id.to_string()))?;
        if !self.handles.is_live(&track.url) {
            log::warn!("Media for {id} is no longer available ({})", track.url);
            return Err(TvboxError::MediaUnavailable(track.url.clone()));
        }
        Ok(self.previewer.toggle(track, sink))
    }

    /// Playback position report from the audio host.
    pub fn preview_progress(&mut self, position_secs: f64) {
        self.previewer.set_position(position_secs);
    }

    /// The audio host finished the playing track.
    pub fn preview_ended(&mut self) {
        self.previewer.ended();
    }

    // -- Frame --

    /// Advance the clock. Returns `true` if the frame needs redrawing.
    pub fn tick(&mut self, now: &NaiveDateTime) -> bool {
        self.clock.tick(&self.hub.get().clock, now)
    }

    pub fn render(&self, renderer: &mut dyn Renderer) -> Result<()> {
        render::render_view(
            &self.view,
            self.focus.cursor(),
            self.clock.face(),
            &self.icons,
            renderer,
        )
    }
}
