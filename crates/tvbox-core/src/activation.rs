//! Activation -- turning a focused tile or the banner into a launch.
//!
//! A tile with a package name launches through an intent URI; a few
//! well-known names open a platform settings screen instead. A tile with
//! only a URL opens it in a new browsing context. A tile with neither is
//! inert and activating it does nothing.

use crate::platform::{Activator, Launch, Toast, Toaster};
use crate::section::BannerSection;
use crate::settings::Tile;

/// Body of the toast shown after a tile launch.
pub const LAUNCH_TOAST_BODY: &str = "Please wait...";

/// Body of the toast shown after a banner launch.
pub const BANNER_TOAST_BODY: &str = "Your premium streaming service";

/// The host services an activation talks to.
pub struct Host<'a> {
    pub activator: &'a mut dyn Activator,
    pub toaster: &'a mut dyn Toaster,
}

impl<'a> Host<'a> {
    pub fn new(activator: &'a mut dyn Activator, toaster: &'a mut dyn Toaster) -> Self {
        Self { activator, toaster }
    }

    fn launch(&mut self, launch: &Launch) {
        match launch {
            Launch::Intent(uri) => self.activator.emit_intent(uri),
            Launch::Url(url) => self.activator.open_url(url),
        }
    }
}

/// Platform settings screens reachable by package name.
const SETTINGS_ACTIONS: &[(&str, &str)] = &[
    ("wifi", "android.settings.WIFI_SETTINGS"),
    ("volume", "android.settings.SOUND_SETTINGS"),
    ("sound", "android.settings.SOUND_SETTINGS"),
    ("brightness", "android.settings.DISPLAY_SETTINGS"),
    ("display", "android.settings.DISPLAY_SETTINGS"),
    ("security", "android.settings.SECURITY_SETTINGS"),
];

/// Intent URI for `package`.
pub fn intent_uri(package: &str) -> String {
    match SETTINGS_ACTIONS.iter().find(|(name, _)| *name == package) {
        Some((_, action)) => format!("intent://#Intent;action={action};end"),
        None => format!("intent://#Intent;package={package};end"),
    }
}

/// What activating `tile` would do, or `None` for an inert tile.
pub fn launch_target(tile: &Tile) -> Option<Launch> {
    if let Some(package) = tile.package_name.as_deref().filter(|p| !p.is_empty()) {
        return Some(Launch::Intent(intent_uri(package)));
    }
    tile.url
        .as_deref()
        .filter(|u| !u.is_empty())
        .map(|u| Launch::Url(u.to_string()))
}

/// Launch `tile` and toast. Returns whether anything was launched.
pub fn activate_tile(tile: &Tile, host: &mut Host<'_>) -> bool {
    let Some(launch) = launch_target(tile) else {
        log::debug!("tile {} has no package or url; ignoring activation", tile.id);
        return false;
    };
    log::info!("Activating {} ({launch:?})", tile.id);
    host.launch(&launch);
    host.toaster
        .toast(Toast::new(format!("Opening {}", tile.label), LAUNCH_TOAST_BODY));
    true
}

/// Open the banner's target and toast.
pub fn activate_banner(banner: &BannerSection, host: &mut Host<'_>) -> bool {
    if banner.url.is_empty() {
        log::debug!("banner has no url; ignoring activation");
        return false;
    }
    host.launch(&Launch::Url(banner.url.clone()));
    host.toaster
        .toast(Toast::new(format!("Opening {}", banner.logo), BANNER_TOAST_BODY));
    true
}
