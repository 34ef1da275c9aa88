//! Theme propagation -- publishes settings colors as style variables.
//!
//! Renderers read colors from named variables (`--primary`, `--card`, ...)
//! rather than from the settings document, so a theme change only rewrites
//! the variables. Color strings are passed through as-is.

use std::collections::BTreeMap;

use crate::settings::Configuration;

pub const PRIMARY: &str = "--primary";
pub const SECONDARY: &str = "--secondary";
pub const ACCENT: &str = "--accent";
pub const BACKGROUND: &str = "--background";
pub const FOREGROUND: &str = "--foreground";
pub const CARD: &str = "--card";
pub const BANNER_BG: &str = "--banner-bg";
pub const BANNER_TEXT: &str = "--banner-text";

/// A place style variables are written to.
pub trait StyleTarget {
    fn set_property(&mut self, name: &str, value: &str);
    fn remove_property(&mut self, name: &str);
}

/// In-memory variable table, iterated in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleVars {
    vars: BTreeMap<String, String>,
}

impl StyleVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl StyleTarget for StyleVars {
    fn set_property(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }

    fn remove_property(&mut self, name: &str) {
        self.vars.remove(name);
    }
}

/// Write the theme (and banner colors, if the banner is shown) to `target`.
pub fn publish(config: &Configuration, target: &mut dyn StyleTarget) {
    let theme = &config.theme;
    target.set_property(PRIMARY, &theme.primary);
    target.set_property(SECONDARY, &theme.secondary);
    target.set_property(ACCENT, &theme.accent);
    target.set_property(BACKGROUND, &theme.background);
    target.set_property(FOREGROUND, &theme.foreground);
    target.set_property(CARD, &theme.card);

    if config.banner.enabled {
        target.set_property(BANNER_BG, &config.banner.background_color);
        target.set_property(BANNER_TEXT, &config.banner.text_color);
    } else {
        target.remove_property(BANNER_BG);
        target.remove_property(BANNER_TEXT);
    }
    log::debug!("published theme (primary {})", theme.primary);
}
