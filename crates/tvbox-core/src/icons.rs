//! Icon registry -- resolves tile icon names to glyphs.

use std::collections::HashMap;

/// Glyph drawn for names the registry does not know.
pub const FALLBACK_GLYPH: char = '▣';

const BUILTIN: &[(&str, char)] = &[
    ("Youtube", '▶'),
    ("Globe", '◍'),
    ("Tv", '▭'),
    ("Music", '♪'),
    ("Settings", '⚙'),
    ("Chrome", '◎'),
    ("Smartphone", '▯'),
    ("Play", '►'),
    ("Wifi", '≋'),
    ("Volume2", '♫'),
    ("Sun", '☀'),
    ("Shield", '⛨'),
    ("Monitor", '▢'),
    ("Radio", '⌁'),
    ("Headphones", '☊'),
];

/// Name -> glyph table.
#[derive(Debug, Clone)]
pub struct IconRegistry {
    glyphs: HashMap<String, char>,
}

impl Default for IconRegistry {
    fn default() -> Self {
        Self {
            glyphs: BUILTIN
                .iter()
                .map(|(name, glyph)| ((*name).to_string(), *glyph))
                .collect(),
        }
    }
}

impl IconRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.glyphs.contains_key(name)
    }

    /// Glyph for `name`, or [`FALLBACK_GLYPH`].
    pub fn resolve(&self, name: &str) -> char {
        match self.glyphs.get(name) {
            Some(glyph) => *glyph,
            None => {
                log::debug!("no icon named {name:?}, using fallback");
                FALLBACK_GLYPH
            },
        }
    }
}
