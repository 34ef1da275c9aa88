//! The persisted settings document and the hub that owns it.
//!
//! Settings are stored as one JSON document under [`SETTINGS_KEY`]. The
//! document is a product of five independent groups (apps, banner, theme,
//! clock, password) and every write replaces exactly one group.
//!
//! Decoding is lenient: a field with the wrong type falls back to its
//! built-in default and the rest of the document is kept. Unknown top-level
//! fields are carried through save/load untouched.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, TvboxError};
use crate::platform::SettingsStore;

/// Store key holding the settings document.
pub const SETTINGS_KEY: &str = "tvbox-admin-settings";

/// Where Enter on the banner goes unless the admin changes it.
pub const DEFAULT_BANNER_URL: &str = "https://redplay.com.br";

/// Password that unlocks the admin panel on first run.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

// ---------------------------------------------------------------------------
// Apps
// ---------------------------------------------------------------------------

/// Kind of music source, used only for music tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MusicCategory {
    Streaming,
    Local,
    Radio,
}

/// A single activatable app tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub id: String,
    #[serde(rename = "name", alias = "label")]
    pub label: String,
    /// Icon name, resolved by the [`crate::icons::IconRegistry`].
    #[serde(default, alias = "iconRef")]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<MusicCategory>,
}

fn enabled_by_default() -> bool {
    true
}

impl Tile {
    /// An enabled tile with no target yet.
    pub fn new(id: impl Into<String>, label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: icon.into(),
            url: None,
            package_name: None,
            enabled: true,
            order: 0,
            category: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package_name = Some(package.into());
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn with_category(mut self, category: MusicCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// An uploaded audio file used by the music previewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalTrack {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    /// Length in seconds (0 until known).
    #[serde(default, rename = "duration")]
    pub duration_secs: f64,
    /// Media handle URL for the uploaded file.
    pub url: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub order: i64,
}

/// The grid an app belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppCategory {
    System,
    Entertainment,
    Music,
}

impl AppCategory {
    pub const ALL: [AppCategory; 3] = [Self::System, Self::Entertainment, Self::Music];

    /// Lowercase name, as typed in the admin console.
    pub fn name(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Entertainment => "entertainment",
            Self::Music => "music",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

/// All app lists. Serialized flat into the settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppCatalog {
    pub system_apps: Vec<Tile>,
    /// Entertainment apps (`apps` in the stored document).
    pub apps: Vec<Tile>,
    pub music_apps: Vec<Tile>,
    pub local_music: Vec<LocalTrack>,
}

impl AppCatalog {
    pub fn tiles(&self, category: AppCategory) -> &[Tile] {
        match category {
            AppCategory::System => &self.system_apps,
            AppCategory::Entertainment => &self.apps,
            AppCategory::Music => &self.music_apps,
        }
    }

    pub fn tiles_mut(&mut self, category: AppCategory) -> &mut Vec<Tile> {
        match category {
            AppCategory::System => &mut self.system_apps,
            AppCategory::Entertainment => &mut self.apps,
            AppCategory::Music => &mut self.music_apps,
        }
    }
}

// ---------------------------------------------------------------------------
// Banner, theme, clock
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerConfig {
    pub title: String,
    pub subtitle: String,
    pub logo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    pub background_color: String,
    pub text_color: String,
    pub enabled: bool,
    /// Target opened when the banner is activated.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(rename = "primaryColor")]
    pub primary: String,
    #[serde(rename = "secondaryColor")]
    pub secondary: String,
    #[serde(rename = "accentColor")]
    pub accent: String,
    #[serde(rename = "backgroundColor")]
    pub background: String,
    #[serde(rename = "textColor")]
    pub foreground: String,
    #[serde(rename = "cardColor")]
    pub card: String,
}

/// Screen corner the clock is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub fn name(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            Self::TopLeft,
            Self::TopRight,
            Self::BottomLeft,
            Self::BottomRight,
        ]
        .into_iter()
        .find(|c| c.name() == name)
    }

    pub fn is_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight)
    }

    pub fn is_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HourFormat {
    #[serde(rename = "12h")]
    H12,
    #[serde(rename = "24h")]
    H24,
}

impl HourFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "12h" => Some(Self::H12),
            "24h" => Some(Self::H24),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockConfig {
    pub enabled: bool,
    pub position: Corner,
    pub format: HourFormat,
    pub show_date: bool,
    pub show_seconds: bool,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// The whole settings document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(flatten)]
    pub apps: AppCatalog,
    pub banner: BannerConfig,
    pub theme: ThemeConfig,
    pub clock: ClockConfig,
    /// Compared verbatim at login.
    pub admin_password: String,
    /// Unknown top-level fields, kept so a newer document survives a
    /// round-trip through this version.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Configuration {
    fn default() -> Self {
        let system_apps = vec![
            Tile::new("wifi", "Wi-Fi", "Wifi").with_package("wifi").with_order(0),
            Tile::new("volume", "Sound", "Volume2")
                .with_package("volume")
                .with_order(1),
            Tile::new("brightness", "Brightness", "Sun")
                .with_package("brightness")
                .with_order(2),
            Tile::new("security", "Security", "Shield")
                .with_package("security")
                .with_order(3),
            Tile::new("display", "Display", "Monitor")
                .with_package("display")
                .with_order(4),
        ];
        let apps = vec![
            Tile::new("youtube", "YouTube", "Youtube")
                .with_url("https://www.youtube.com")
                .with_package("com.google.android.youtube.tv")
                .with_order(0),
            Tile::new("google", "Google", "Globe")
                .with_url("https://www.google.com")
                .with_order(1),
            Tile::new("tvemove", "TveMove", "Tv")
                .with_url("https://dl.ntdev.in/58331")
                .with_order(2),
        ];
        let streaming = |id: &str, label: &str, icon: &str, package: &str, order: i64| {
            Tile::new(id, label, icon)
                .with_package(package)
                .with_order(order)
                .with_category(MusicCategory::Streaming)
        };
        let music_apps = vec![
            streaming("spotify", "Spotify", "Music", "com.spotify.music", 0),
            streaming(
                "youtube-music",
                "YouTube Music",
                "Youtube",
                "com.google.android.apps.youtube.music",
                1,
            ),
            streaming("deezer", "Deezer", "Music", "deezer.android.app", 2),
            streaming("apple-music", "Apple Music", "Music", "com.apple.android.music", 3),
            streaming("tidal", "Tidal", "Music", "com.aspiro.tidal", 4),
            streaming("soundcloud", "SoundCloud", "Music", "com.soundcloud.android", 5),
        ];

        Self {
            apps: AppCatalog {
                system_apps,
                apps,
                music_apps,
                local_music: Vec::new(),
            },
            banner: BannerConfig {
                title: "CHEGOU A HORA".to_string(),
                subtitle: "DE VOCÊ TER TUDO".to_string(),
                logo: "RedPlay".to_string(),
                background_image: None,
                background_color: "#1a1a1a".to_string(),
                text_color: "#ffffff".to_string(),
                enabled: true,
                url: DEFAULT_BANNER_URL.to_string(),
            },
            theme: ThemeConfig {
                primary: "#3b82f6".to_string(),
                secondary: "#1e40af".to_string(),
                accent: "#f59e0b".to_string(),
                background: "#0f172a".to_string(),
                foreground: "#f8fafc".to_string(),
                card: "#1e293b".to_string(),
            },
            clock: ClockConfig {
                enabled: true,
                position: Corner::TopRight,
                format: HourFormat::H24,
                show_date: true,
                show_seconds: false,
            },
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            extra: Map::new(),
        }
    }
}

impl Configuration {
    /// Decode a stored document. Never fails: an unreadable document yields
    /// the defaults, and wrong-typed fields fall back one by one.
    pub fn from_json(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::from_value(value),
            Err(e) => {
                log::warn!("Stored settings are not valid JSON, using defaults: {e}");
                Self::default()
            },
        }
    }

    /// Decode an already-parsed document. See [`Configuration::from_json`].
    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = value else {
            log::warn!("Stored settings are not a JSON object, using defaults");
            return Self::default();
        };

        let defaults = Self::default();
        let mut config = defaults.clone();
        for (key, value) in map {
            match key.as_str() {
                "systemApps" => {
                    if let Some(list) = decode_list(&key, value) {
                        config.apps.system_apps = list;
                    }
                },
                "apps" => {
                    if let Some(list) = decode_list(&key, value) {
                        config.apps.apps = list;
                    }
                },
                "musicApps" => {
                    if let Some(list) = decode_list(&key, value) {
                        config.apps.music_apps = list;
                    }
                },
                "localMusic" => {
                    if let Some(list) = decode_list(&key, value) {
                        config.apps.local_music = list;
                    }
                },
                "banner" => config.banner = merge_fields(&key, &defaults.banner, value),
                "theme" => config.theme = merge_fields(&key, &defaults.theme, value),
                "clock" => config.clock = merge_fields(&key, &defaults.clock, value),
                "adminPassword" => match value {
                    Value::String(password) => config.admin_password = password,
                    other => report_shape(&key, &format!("expected a string, found {other}")),
                },
                _ => {
                    config.extra.insert(key, value);
                },
            }
        }
        config
    }

    /// Encode for storage.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Replace one group.
    pub fn apply(&mut self, update: SettingsUpdate) {
        match update {
            SettingsUpdate::Apps(apps) => self.apps = apps,
            SettingsUpdate::Banner(banner) => self.banner = banner,
            SettingsUpdate::Theme(theme) => self.theme = theme,
            SettingsUpdate::Clock(clock) => self.clock = clock,
            SettingsUpdate::Password(password) => self.admin_password = password,
        }
    }
}

fn report_shape(field: &str, reason: &str) {
    let err = TvboxError::InvalidConfigShape {
        field: field.to_string(),
        reason: reason.to_string(),
    };
    log::warn!("{err}; using default");
}

/// Decode a list, dropping entries that do not fit `T`. Returns `None` (keep
/// the default list) when the value is not an array at all.
fn decode_list<T: DeserializeOwned>(field: &str, value: Value) -> Option<Vec<T>> {
    let Value::Array(items) = value else {
        report_shape(field, "expected an array");
        return None;
    };
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match serde_json::from_value(item) {
            Ok(entry) => out.push(entry),
            Err(e) => report_shape(&format!("{field}[{i}]"), &e.to_string()),
        }
    }
    Some(out)
}

/// Overlay the fields of `patch` onto `default`, keeping the default for any
/// field whose stored value does not decode.
fn merge_fields<T>(field: &str, default: &T, patch: Value) -> T
where
    T: Serialize + DeserializeOwned + Clone,
{
    let Value::Object(patch) = patch else {
        report_shape(field, "expected an object");
        return default.clone();
    };
    let Ok(Value::Object(mut base)) = serde_json::to_value(default) else {
        return default.clone();
    };

    for (key, value) in patch {
        let previous = base.insert(key.clone(), value);
        if let Err(e) = serde_json::from_value::<T>(Value::Object(base.clone())) {
            report_shape(&format!("{field}.{key}"), &e.to_string());
            match previous {
                Some(previous) => base.insert(key, previous),
                None => base.remove(&key),
            };
        }
    }
    serde_json::from_value(Value::Object(base)).unwrap_or_else(|_| default.clone())
}

/// A write to exactly one settings group.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsUpdate {
    Apps(AppCatalog),
    Banner(BannerConfig),
    Theme(ThemeConfig),
    Clock(ClockConfig),
    Password(String),
}

// ---------------------------------------------------------------------------
// Hub
// ---------------------------------------------------------------------------

/// Owner of the live settings document.
///
/// Readers take cheap [`Arc`] snapshots; writers publish whole groups
/// through [`SettingsHub::update`]. Every write bumps the revision and is
/// persisted best-effort (a failed write is logged; the next write retries).
pub struct SettingsHub {
    store: Box<dyn SettingsStore>,
    current: Arc<Configuration>,
    revision: u64,
}

impl SettingsHub {
    /// Load the document from `store`, falling back to defaults.
    pub fn load(store: Box<dyn SettingsStore>) -> Self {
        let config = match store.get(SETTINGS_KEY) {
            Ok(Some(text)) => {
                log::info!("Loaded settings ({} bytes)", text.len());
                Configuration::from_json(&text)
            },
            Ok(None) => {
                log::info!("No stored settings, using defaults");
                Configuration::default()
            },
            Err(e) => {
                log::warn!("Settings store unavailable, using defaults: {e}");
                Configuration::default()
            },
        };
        Self {
            store,
            current: Arc::new(config),
            revision: 0,
        }
    }

    /// The latest document.
    pub fn snapshot(&self) -> Arc<Configuration> {
        Arc::clone(&self.current)
    }

    /// Borrow the latest document.
    pub fn get(&self) -> &Configuration {
        &self.current
    }

    /// Incremented on every write.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Publish one group and persist.
    pub fn update(&mut self, update: SettingsUpdate) {
        let mut next = (*self.current).clone();
        next.apply(update);
        self.current = Arc::new(next);
        self.revision += 1;
        if let Err(e) = self.save() {
            log::warn!("Failed to persist settings (kept in memory): {e}");
        }
    }

    /// Write the current document to the store.
    pub fn save(&mut self) -> Result<()> {
        let text = self.current.to_json()?;
        self.store.set(SETTINGS_KEY, &text)
    }
}
