//! Section model -- the ordered banner + grid layout built from settings.
//!
//! The view is a pure function of the settings document: the banner (when
//! enabled) followed by the System, Entertainment and Music grids, each
//! holding its enabled tiles sorted by `order`.

use crate::config::ColumnsConfig;
use crate::settings::{AppCategory, BannerConfig, Configuration, Tile};

/// Stable identity of a section. The derive order is the on-screen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionId {
    Banner,
    System,
    Entertainment,
    Music,
}

impl SectionId {
    /// Heading shown above a grid.
    pub fn title(self) -> &'static str {
        match self {
            Self::Banner => "Featured",
            Self::System => "System",
            Self::Entertainment => "Apps",
            Self::Music => "Music",
        }
    }
}

impl From<AppCategory> for SectionId {
    fn from(category: AppCategory) -> Self {
        match category {
            AppCategory::System => Self::System,
            AppCategory::Entertainment => Self::Entertainment,
            AppCategory::Music => Self::Music,
        }
    }
}

/// The hero section. Focusable as a single unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerSection {
    pub title: String,
    pub subtitle: String,
    pub logo: String,
    pub background_image: Option<String>,
    /// Activation target.
    pub url: String,
}

impl From<&BannerConfig> for BannerSection {
    fn from(b: &BannerConfig) -> Self {
        Self {
            title: b.title.clone(),
            subtitle: b.subtitle.clone(),
            logo: b.logo.clone(),
            background_image: b.background_image.clone(),
            url: b.url.clone(),
        }
    }
}

/// A grid of tiles laid out row-major in `columns` columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSection {
    pub id: SectionId,
    /// Always >= 1.
    pub columns: usize,
    /// Enabled tiles only, in display order.
    pub tiles: Vec<Tile>,
}

impl GridSection {
    /// Build a grid, clamping `columns` to at least 1.
    pub fn new(id: SectionId, columns: usize, tiles: Vec<Tile>) -> Self {
        if columns == 0 {
            log::warn!("{id:?} grid configured with 0 columns, using 1");
        }
        Self {
            id,
            columns: columns.max(1),
            tiles,
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Number of rows (the last one may be short).
    pub fn rows(&self) -> usize {
        self.tiles.len().div_ceil(self.columns)
    }

    /// Index of the tile with `id`, if present.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.tiles.iter().position(|t| t.id == id)
    }
}

/// A renderable section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Banner(BannerSection),
    Grid(GridSection),
}

impl Section {
    pub fn id(&self) -> SectionId {
        match self {
            Self::Banner(_) => SectionId::Banner,
            Self::Grid(g) => g.id,
        }
    }

    /// Whether the section can hold the focus cursor. Empty grids cannot.
    pub fn is_focusable(&self) -> bool {
        match self {
            Self::Banner(_) => true,
            Self::Grid(g) => !g.is_empty(),
        }
    }

    pub fn as_grid(&self) -> Option<&GridSection> {
        match self {
            Self::Grid(g) => Some(g),
            Self::Banner(_) => None,
        }
    }
}

/// The ordered list of sections on the home surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub sections: Vec<Section>,
}

impl View {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Index of the section with `id`.
    pub fn index_of(&self, id: SectionId) -> Option<usize> {
        self.sections.iter().position(|s| s.id() == id)
    }

    /// Whether anything on screen can take focus.
    pub fn has_focusable(&self) -> bool {
        self.sections.iter().any(Section::is_focusable)
    }
}

/// Column count per grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridColumns {
    pub system: usize,
    pub entertainment: usize,
    pub music: usize,
}

impl Default for GridColumns {
    fn default() -> Self {
        ColumnsConfig::default().into()
    }
}

impl From<ColumnsConfig> for GridColumns {
    fn from(c: ColumnsConfig) -> Self {
        Self {
            system: c.system,
            entertainment: c.entertainment,
            music: c.music,
        }
    }
}

impl GridColumns {
    pub fn for_category(&self, category: AppCategory) -> usize {
        match category {
            AppCategory::System => self.system,
            AppCategory::Entertainment => self.entertainment,
            AppCategory::Music => self.music,
        }
    }
}

/// Build the view with the default column counts.
pub fn materialize(config: &Configuration) -> View {
    materialize_with(config, GridColumns::default())
}

/// Build the view: banner (iff enabled), then System, Entertainment, Music.
pub fn materialize_with(config: &Configuration, columns: GridColumns) -> View {
    let mut sections = Vec::with_capacity(4);
    if config.banner.enabled {
        sections.push(Section::Banner(BannerSection::from(&config.banner)));
    }
    for category in AppCategory::ALL {
        let tiles = visible_tiles(config.apps.tiles(category));
        sections.push(Section::Grid(GridSection::new(
            category.into(),
            columns.for_category(category),
            tiles,
        )));
    }
    View::new(sections)
}

/// Enabled tiles sorted by `order`. The sort is stable, so equal orders
/// keep their insertion order.
pub fn visible_tiles(tiles: &[Tile]) -> Vec<Tile> {
    let mut visible: Vec<Tile> = tiles.iter().filter(|t| t.enabled).cloned().collect();
    visible.sort_by_key(|t| t.order);
    visible
}
