//! Admin panel -- password-gated editing of the settings document.
//!
//! Every operation reads the current document and returns a
//! [`SettingsUpdate`] replacing exactly one group. Nothing is written here;
//! the launcher publishes the update through the settings hub so the view,
//! focus and theme follow in the same step.
//!
//! The password is compared verbatim against the stored one.

use crate::error::{Result, TvboxError};
use crate::music::{self, TrackPatch};
use crate::platform::MediaHandles;
use crate::settings::{
    AppCatalog, AppCategory, BannerConfig, ClockConfig, Configuration, Corner, HourFormat,
    MusicCategory, SettingsUpdate, ThemeConfig, Tile,
};

/// Whether the admin panel is unlocked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminSession {
    open: bool,
}

impl AdminSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Unlock with `password`. The only user-visible error in the launcher.
    pub fn login(&mut self, config: &Configuration, password: &str) -> Result<()> {
        if password != config.admin_password {
            log::warn!("Admin login rejected");
            return Err(TvboxError::IncorrectPassword);
        }
        log::info!("Admin mode entered");
        self.open = true;
        Ok(())
    }

    pub fn logout(&mut self) {
        if self.open {
            log::info!("Admin mode left");
        }
        self.open = false;
    }
}

// ---------------------------------------------------------------------------
// Patches
// ---------------------------------------------------------------------------

/// Field-wise tile edit. Outer `None` leaves a field alone; for optional
/// fields `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TilePatch {
    pub label: Option<String>,
    pub icon: Option<String>,
    pub url: Option<Option<String>>,
    pub package_name: Option<Option<String>>,
    pub enabled: Option<bool>,
    pub order: Option<i64>,
    pub category: Option<Option<MusicCategory>>,
}

impl TilePatch {
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Self::default()
        }
    }

    pub fn apply(&self, tile: &mut Tile) {
        if let Some(label) = &self.label {
            tile.label.clone_from(label);
        }
        if let Some(icon) = &self.icon {
            tile.icon.clone_from(icon);
        }
        if let Some(url) = &self.url {
            tile.url.clone_from(url);
        }
        if let Some(package) = &self.package_name {
            tile.package_name.clone_from(package);
        }
        if let Some(enabled) = self.enabled {
            tile.enabled = enabled;
        }
        if let Some(order) = self.order {
            tile.order = order;
        }
        if let Some(category) = self.category {
            tile.category = category;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BannerPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub logo: Option<String>,
    pub background_image: Option<Option<String>>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub enabled: Option<bool>,
    pub url: Option<String>,
}

impl BannerPatch {
    pub fn apply(&self, banner: &mut BannerConfig) {
        let fields = [
            (&self.title, &mut banner.title),
            (&self.subtitle, &mut banner.subtitle),
            (&self.logo, &mut banner.logo),
            (&self.background_color, &mut banner.background_color),
            (&self.text_color, &mut banner.text_color),
            (&self.url, &mut banner.url),
        ];
        for (patch, field) in fields {
            if let Some(value) = patch {
                field.clone_from(value);
            }
        }
        if let Some(image) = &self.background_image {
            banner.background_image.clone_from(image);
        }
        if let Some(enabled) = self.enabled {
            banner.enabled = enabled;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemePatch {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub accent: Option<String>,
    pub background: Option<String>,
    pub foreground: Option<String>,
    pub card: Option<String>,
}

impl ThemePatch {
    /// Patch a single color by its settings name (`primary`, `card`, ...).
    pub fn color(name: &str, value: impl Into<String>) -> Option<Self> {
        let value = Some(value.into());
        let mut patch = Self::default();
        match name {
            "primary" => patch.primary = value,
            "secondary" => patch.secondary = value,
            "accent" => patch.accent = value,
            "background" => patch.background = value,
            "foreground" | "text" => patch.foreground = value,
            "card" => patch.card = value,
            _ => return None,
        }
        Some(patch)
    }

    pub fn apply(&self, theme: &mut ThemeConfig) {
        let fields = [
            (&self.primary, &mut theme.primary),
            (&self.secondary, &mut theme.secondary),
            (&self.accent, &mut theme.accent),
            (&self.background, &mut theme.background),
            (&self.foreground, &mut theme.foreground),
            (&self.card, &mut theme.card),
        ];
        for (patch, field) in fields {
            if let Some(value) = patch {
                field.clone_from(value);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockPatch {
    pub enabled: Option<bool>,
    pub position: Option<Corner>,
    pub format: Option<HourFormat>,
    pub show_date: Option<bool>,
    pub show_seconds: Option<bool>,
}

impl ClockPatch {
    pub fn apply(&self, clock: &mut ClockConfig) {
        if let Some(enabled) = self.enabled {
            clock.enabled = enabled;
        }
        if let Some(position) = self.position {
            clock.position = position;
        }
        if let Some(format) = self.format {
            clock.format = format;
        }
        if let Some(show_date) = self.show_date {
            clock.show_date = show_date;
        }
        if let Some(show_seconds) = self.show_seconds {
            clock.show_seconds = show_seconds;
        }
    }
}

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

/// Editing operations over one settings snapshot.
pub struct AdminPanel<'a> {
    session: &'a AdminSession,
    config: &'a Configuration,
}

impl<'a> AdminPanel<'a> {
    pub fn new(session: &'a AdminSession, config: &'a Configuration) -> Self {
        Self { session, config }
    }

    fn guard(&self) -> Result<()> {
        if self.session.is_open() {
            Ok(())
        } else {
            Err(TvboxError::AdminRequired)
        }
    }

    /// Copy of the catalog for editing, after the session check.
    fn catalog(&self) -> Result<AppCatalog> {
        self.guard()?;
        Ok(self.config.apps.clone())
    }

    /// Append `tile` to `category`. Ids must be unique across all grids.
    pub fn add_app(&self, category: AppCategory, tile: Tile) -> Result<SettingsUpdate> {
        let mut apps = self.catalog()?;
        if AppCategory::ALL
            .iter()
            .any(|c| apps.tiles(*c).iter().any(|t| t.id == tile.id))
        {
            return Err(TvboxError::DuplicateTile(tile.id));
        }
        log::info!("Adding {} to {}", tile.id, category.name());
        apps.tiles_mut(category).push(tile);
        Ok(SettingsUpdate::Apps(apps))
    }

    /// Append a placeholder tile (`app-<millis>`, "New App", Globe) placed
    /// after the existing ones.
    pub fn new_app(&self, category: AppCategory, now_millis: i64) -> Result<SettingsUpdate> {
        self.guard()?;
        let existing = self.config.apps.tiles(category);
        let base = format!("app-{now_millis}");
        let mut id = base.clone();
        let mut n = 1;
        while AppCategory::ALL
            .iter()
            .any(|c| self.config.apps.tiles(*c).iter().any(|t| t.id == id))
        {
            n += 1;
            id = format!("{base}-{n}");
        }
        let tile = Tile::new(id, "New App", "Globe").with_order(existing.len() as i64);
        self.add_app(category, tile)
    }

    pub fn remove_app(&self, category: AppCategory, id: &str) -> Result<SettingsUpdate> {
        let mut apps = self.catalog()?;
        let tiles = apps.tiles_mut(category);
        let before = tiles.len();
        tiles.retain(|t| t.id != id);
        if tiles.len() == before {
            return Err(TvboxError::UnknownTile(id.to_string()));
        }
        log::info!("Removed {id} from {}", category.name());
        Ok(SettingsUpdate::Apps(apps))
    }

    pub fn update_app(
        &self,
        category: AppCategory,
        id: &str,
        patch: &TilePatch,
    ) -> Result<SettingsUpdate> {
        let mut apps = self.catalog()?;
        let tile = apps
            .tiles_mut(category)
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TvboxError::UnknownTile(id.to_string()))?;
        patch.apply(tile);
        Ok(SettingsUpdate::Apps(apps))
    }

    /// Move the tile at position `from` to `to` and renumber the whole grid
    /// `0..n`. Positions index the admin list: every tile of the category
    /// sorted by order, disabled ones included, not only the visible ones.
    pub fn reorder_apps(
        &self,
        category: AppCategory,
        from: usize,
        to: usize,
    ) -> Result<SettingsUpdate> {
        let mut apps = self.catalog()?;
        let tiles = apps.tiles_mut(category);
        if from >= tiles.len() || to >= tiles.len() {
            return Err(TvboxError::Command(format!(
                "position out of range (grid has {} tiles)",
                tiles.len()
            )));
        }
        tiles.sort_by_key(|t| t.order);
        let moved = tiles.remove(from);
        tiles.insert(to, moved);
        for (order, tile) in tiles.iter_mut().enumerate() {
            tile.order = order as i64;
        }
        Ok(SettingsUpdate::Apps(apps))
    }

    /// [`AdminPanel::reorder_apps`] addressed by tile id.
    pub fn move_app(&self, category: AppCategory, id: &str, to: usize) -> Result<SettingsUpdate> {
        self.guard()?;
        let mut ordered: Vec<&Tile> = self.config.apps.tiles(category).iter().collect();
        ordered.sort_by_key(|t| t.order);
        let from = ordered
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TvboxError::UnknownTile(id.to_string()))?;
        self.reorder_apps(category, from, to)
    }

    pub fn update_banner(&self, patch: &BannerPatch) -> Result<SettingsUpdate> {
        self.guard()?;
        let mut banner = self.config.banner.clone();
        patch.apply(&mut banner);
        Ok(SettingsUpdate::Banner(banner))
    }

    pub fn update_theme(&self, patch: &ThemePatch) -> Result<SettingsUpdate> {
        self.guard()?;
        let mut theme = self.config.theme.clone();
        patch.apply(&mut theme);
        Ok(SettingsUpdate::Theme(theme))
    }

    pub fn update_clock(&self, patch: &ClockPatch) -> Result<SettingsUpdate> {
        self.guard()?;
        let mut clock = self.config.clock;
        patch.apply(&mut clock);
        Ok(SettingsUpdate::Clock(clock))
    }

    pub fn change_password(&self, password: &str) -> Result<SettingsUpdate> {
        self.guard()?;
        log::info!("Admin password changed");
        Ok(SettingsUpdate::Password(password.to_string()))
    }

    pub fn import_track(
        &self,
        id: &str,
        file_name: &str,
        duration_secs: f64,
        handles: &mut dyn MediaHandles,
    ) -> Result<SettingsUpdate> {
        let mut apps = self.catalog()?;
        music::import_track(&mut apps.local_music, id, file_name, duration_secs, handles)?;
        Ok(SettingsUpdate::Apps(apps))
    }

    pub fn remove_track(&self, id: &str, handles: &mut dyn MediaHandles) -> Result<SettingsUpdate> {
        let mut apps = self.catalog()?;
        music::remove_track(&mut apps.local_music, id, handles)?;
        Ok(SettingsUpdate::Apps(apps))
    }

    pub fn update_track(&self, id: &str, patch: &TrackPatch) -> Result<SettingsUpdate> {
        let mut apps = self.catalog()?;
        music::update_track(&mut apps.local_music, id, patch)?;
        Ok(SettingsUpdate::Apps(apps))
    }
}
