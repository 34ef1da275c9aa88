//! Focus navigation -- the cursor that arrow keys move across the view.
//!
//! The cursor is a `(section, tile)` pair. On the banner the tile index is
//! unused. On a grid it always names a live tile; empty grids never hold
//! the cursor. Transitions are total per section variant:
//!
//! | input        | banner                     | grid                                                   |
//! |--------------|----------------------------|--------------------------------------------------------|
//! | Left / Right | stay                       | `(i -/+ 1) mod N`, never leaves the section            |
//! | Down         | next focusable section     | `i + C` if it exists, else next focusable section      |
//! | Up           | stay                       | `i - C` on rows > 0, else previous focusable section   |
//! | Activate     | report the banner          | report the tile                                        |
//!
//! Vertical section hops never wrap, and entering a section always lands on
//! its first tile.

use crate::section::{BannerSection, Section, SectionId, View};
use crate::settings::Tile;

/// Abstract navigation input produced by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavInput {
    Left,
    Right,
    Up,
    Down,
    Activate,
}

/// Position of the focus highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub section: usize,
    /// Ignored when `section` is the banner.
    pub tile: usize,
}

impl Cursor {
    pub fn new(section: usize, tile: usize) -> Self {
        Self { section, tile }
    }
}

/// What the cursor currently points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget<'a> {
    Banner(&'a BannerSection),
    Tile { section: SectionId, tile: &'a Tile },
}

/// Outcome of one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The cursor moved.
    Moved { from: Cursor, to: Cursor },
    /// The input was valid but changed nothing (edge of the view, banner
    /// left/right, single-tile wrap).
    Stayed(Cursor),
    /// Activate at this cursor.
    Activate(Cursor),
    /// Nothing on screen can take focus.
    Unfocusable,
}

/// Owner of the cursor.
#[derive(Debug, Clone, Default)]
pub struct FocusMachine {
    cursor: Option<Cursor>,
    /// Cursor that had to be recovered on the previous input, if any.
    last_recovered: Option<Cursor>,
}

impl FocusMachine {
    /// Place the cursor on the banner if there is one, else on the first
    /// tile of the first non-empty grid.
    pub fn new(view: &View) -> Self {
        Self {
            cursor: initial_cursor(view),
            last_recovered: None,
        }
    }

    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    /// Whether the cursor (if any) names a focusable element of `view`, and
    /// whether a cursor exists whenever one could.
    pub fn is_valid(&self, view: &View) -> bool {
        match self.cursor {
            Some(c) => cursor_is_valid(view, c),
            None => !view.has_focusable(),
        }
    }

    /// The element under the cursor.
    pub fn focused<'v>(&self, view: &'v View) -> Option<FocusTarget<'v>> {
        let cursor = self.cursor?;
        match view.get(cursor.section)? {
            Section::Banner(b) => Some(FocusTarget::Banner(b)),
            Section::Grid(g) => g.tiles.get(cursor.tile).map(|tile| FocusTarget::Tile {
                section: g.id,
                tile,
            }),
        }
    }

    /// Move the cursor to `cursor` if it is valid for `view` (used for
    /// pointer clicks). Returns whether it was accepted.
    pub fn set_cursor(&mut self, view: &View, cursor: Cursor) -> bool {
        if !cursor_is_valid(view, cursor) {
            return false;
        }
        let cursor = match view.get(cursor.section) {
            Some(Section::Banner(_)) => Cursor::new(cursor.section, 0),
            _ => cursor,
        };
        self.cursor = Some(cursor);
        self.last_recovered = None;
        true
    }

    /// Apply one input.
    pub fn apply(&mut self, view: &View, input: NavInput) -> Transition {
        let Some(cursor) = self.checked_cursor(view) else {
            return Transition::Unfocusable;
        };
        let Some(section) = view.get(cursor.section) else {
            return Transition::Unfocusable;
        };

        let target = match (section, input) {
            (_, NavInput::Activate) => return Transition::Activate(cursor),

            (Section::Banner(_), NavInput::Left | NavInput::Right | NavInput::Up) => None,
            (Section::Banner(_), NavInput::Down) => next_entry(view, cursor.section),

            (Section::Grid(g), NavInput::Right) => {
                Some(Cursor::new(cursor.section, (cursor.tile + 1) % g.len()))
            },
            (Section::Grid(g), NavInput::Left) => Some(Cursor::new(
                cursor.section,
                (cursor.tile + g.len() - 1) % g.len(),
            )),
            (Section::Grid(g), NavInput::Down) => {
                // Same column, next row. When that slot is empty (last row,
                // or a short row below) Down crosses into the next section.
                let below = cursor.tile + g.columns;
                if below < g.len() {
                    Some(Cursor::new(cursor.section, below))
                } else {
                    next_entry(view, cursor.section)
                }
            },
            (Section::Grid(g), NavInput::Up) => {
                if cursor.tile >= g.columns {
                    Some(Cursor::new(cursor.section, cursor.tile - g.columns))
                } else {
                    prev_entry(view, cursor.section)
                }
            },
        };

        match target {
            Some(to) if to != cursor => {
                self.cursor = Some(to);
                Transition::Moved { from: cursor, to }
            },
            _ => Transition::Stayed(cursor),
        }
    }

    /// Re-seat the cursor after the view changed from `previous` to `next`.
    ///
    /// The focused tile keeps focus if it is still in its section (even at a
    /// new index, e.g. after a column or order change). Otherwise the index
    /// is clamped within the same section; if that section is gone or empty
    /// the cursor hops to the next focusable section's first tile, then the
    /// previous grid's last tile, then the banner.
    pub fn revalidate(&mut self, previous: &View, next: &View) {
        self.last_recovered = None;
        let Some(cursor) = self.cursor else {
            self.cursor = initial_cursor(next);
            return;
        };
        let Some(old_section) = previous.get(cursor.section) else {
            self.cursor = recover(next, cursor);
            return;
        };

        let old_id = old_section.id();
        let old_tile_id = old_section
            .as_grid()
            .and_then(|g| g.tiles.get(cursor.tile))
            .map(|t| t.id.as_str());

        self.cursor = match next.index_of(old_id) {
            Some(idx) => match &next.sections[idx] {
                Section::Banner(_) => Some(Cursor::new(idx, 0)),
                Section::Grid(g) if !g.is_empty() => {
                    let tile = old_tile_id
                        .and_then(|id| g.position(id))
                        .unwrap_or_else(|| cursor.tile.min(g.len() - 1));
                    Some(Cursor::new(idx, tile))
                },
                Section::Grid(_) => hop(next, idx + 1, idx),
            },
            None => {
                // Where the vanished section would have been.
                let gap = next
                    .sections
                    .iter()
                    .position(|s| s.id() > old_id)
                    .unwrap_or(next.len());
                hop(next, gap, gap)
            },
        };
        log::trace!("focus revalidated: {cursor:?} -> {:?}", self.cursor);
    }

    /// The cursor, repaired by clamp/hop if the view moved under it without
    /// a `revalidate`.
    fn checked_cursor(&mut self, view: &View) -> Option<Cursor> {
        let cursor = match self.cursor {
            Some(c) => c,
            None => {
                self.cursor = initial_cursor(view);
                return self.cursor;
            },
        };
        if cursor_is_valid(view, cursor) {
            self.last_recovered = None;
            return Some(cursor);
        }

        if self.last_recovered == Some(cursor) {
            log::error!("focus cursor {cursor:?} needed recovery on consecutive inputs");
            debug_assert!(false, "focus cursor {cursor:?} recovered twice in a row");
        }
        self.last_recovered = Some(cursor);
        self.cursor = recover(view, cursor);
        log::debug!("recovered out-of-range cursor {cursor:?} -> {:?}", self.cursor);
        self.cursor
    }
}

fn cursor_is_valid(view: &View, cursor: Cursor) -> bool {
    match view.get(cursor.section) {
        Some(Section::Banner(_)) => true,
        Some(Section::Grid(g)) => cursor.tile < g.len(),
        None => false,
    }
}

fn initial_cursor(view: &View) -> Option<Cursor> {
    banner_cursor(view).or_else(|| (0..view.len()).find_map(|i| entry_cursor(view, i)))
}

fn banner_cursor(view: &View) -> Option<Cursor> {
    view.sections
        .iter()
        .position(|s| matches!(s, Section::Banner(_)))
        .map(|i| Cursor::new(i, 0))
}

/// Where the cursor lands when entering section `index`.
fn entry_cursor(view: &View, index: usize) -> Option<Cursor> {
    view.get(index)
        .filter(|s| s.is_focusable())
        .map(|_| Cursor::new(index, 0))
}

/// Last tile of grid `index`, if it has any.
fn last_tile_cursor(view: &View, index: usize) -> Option<Cursor> {
    match view.get(index)? {
        Section::Grid(g) if !g.is_empty() => Some(Cursor::new(index, g.len() - 1)),
        _ => None,
    }
}

fn next_entry(view: &View, from: usize) -> Option<Cursor> {
    (from + 1..view.len()).find_map(|i| entry_cursor(view, i))
}

fn prev_entry(view: &View, from: usize) -> Option<Cursor> {
    (0..from.min(view.len())).rev().find_map(|i| entry_cursor(view, i))
}

/// Hop search: first focusable section at or after `next_from`, else the
/// last tile of the nearest grid before `prev_before`, else the banner.
fn hop(view: &View, next_from: usize, prev_before: usize) -> Option<Cursor> {
    (next_from..view.len())
        .find_map(|i| entry_cursor(view, i))
        .or_else(|| {
            (0..prev_before.min(view.len()))
                .rev()
                .find_map(|i| last_tile_cursor(view, i))
        })
        .or_else(|| banner_cursor(view))
}

/// Index-only repair for a cursor that no longer fits `view`.
fn recover(view: &View, cursor: Cursor) -> Option<Cursor> {
    match view.get(cursor.section) {
        Some(Section::Banner(_)) => Some(Cursor::new(cursor.section, 0)),
        Some(Section::Grid(g)) if !g.is_empty() => {
            Some(Cursor::new(cursor.section, cursor.tile.min(g.len() - 1)))
        },
        Some(Section::Grid(_)) => hop(view, cursor.section + 1, cursor.section),
        None => hop(view, view.len(), view.len()),
    }
}
