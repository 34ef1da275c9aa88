//! Renderer trait and the plain-text renderer.
//!
//! The core walks the view and hands each section to a [`Renderer`] along
//! with what is focused. Renderers decide layout and styling; the only
//! visual rule the core owns is the focus scale.

use crate::clock::ClockFace;
use crate::error::Result;
use crate::focus::Cursor;
use crate::icons::IconRegistry;
use crate::section::{BannerSection, GridSection, Section, View};

/// Scale of a focused tile.
pub const TILE_FOCUS_SCALE: f32 = 1.10;
/// Scale of the focused banner.
pub const BANNER_FOCUS_SCALE: f32 = 1.01;

/// How an element is highlighted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    pub focused: bool,
    pub scale: f32,
}

impl Highlight {
    pub const NONE: Self = Self {
        focused: false,
        scale: 1.0,
    };

    pub fn tile(focused: bool) -> Self {
        if focused {
            Self {
                focused,
                scale: TILE_FOCUS_SCALE,
            }
        } else {
            Self::NONE
        }
    }

    pub fn banner(focused: bool) -> Self {
        if focused {
            Self {
                focused,
                scale: BANNER_FOCUS_SCALE,
            }
        } else {
            Self::NONE
        }
    }
}

/// Draws the home surface.
pub trait Renderer {
    fn draw_banner(&mut self, banner: &BannerSection, highlight: Highlight) -> Result<()>;

    /// Draw a grid; `focused` is the index of the focused tile, if it is in
    /// this grid. Use [`Highlight::tile`] per tile.
    fn draw_grid(
        &mut self,
        grid: &GridSection,
        focused: Option<usize>,
        icons: &IconRegistry,
    ) -> Result<()>;

    fn draw_clock(&mut self, face: &ClockFace) -> Result<()>;
}

/// Draw one frame. A top-corner clock is drawn before the sections, a
/// bottom-corner clock after them.
pub fn render_view(
    view: &View,
    cursor: Option<Cursor>,
    clock: Option<&ClockFace>,
    icons: &IconRegistry,
    renderer: &mut dyn Renderer,
) -> Result<()> {
    let top_clock = clock.filter(|f| f.corner.is_top());
    let bottom_clock = clock.filter(|f| !f.corner.is_top());

    if let Some(face) = top_clock {
        renderer.draw_clock(face)?;
    }
    for (index, section) in view.sections.iter().enumerate() {
        let here = cursor.filter(|c| c.section == index);
        match section {
            Section::Banner(banner) => {
                renderer.draw_banner(banner, Highlight::banner(here.is_some()))?;
            },
            Section::Grid(grid) => {
                renderer.draw_grid(grid, here.map(|c| c.tile), icons)?;
            },
        }
    }
    if let Some(face) = bottom_clock {
        renderer.draw_clock(face)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Text renderer
// ---------------------------------------------------------------------------

/// Renders a frame as lines of text. Focused elements are wrapped in `>` `<`.
#[derive(Debug, Default)]
pub struct TextRenderer {
    lines: Vec<String>,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The finished frame; clears the buffer for the next one.
    pub fn take_frame(&mut self) -> String {
        let frame = self.lines.join("\n");
        self.lines.clear();
        frame
    }
}

impl Renderer for TextRenderer {
    fn draw_banner(&mut self, banner: &BannerSection, highlight: Highlight) -> Result<()> {
        let body = format!("{} | {} | {}", banner.logo, banner.title, banner.subtitle);
        self.lines.push(if highlight.focused {
            format!(">> {body} <<")
        } else {
            format!("   {body}")
        });
        Ok(())
    }

    fn draw_grid(
        &mut self,
        grid: &GridSection,
        focused: Option<usize>,
        icons: &IconRegistry,
    ) -> Result<()> {
        self.lines.push(format!("== {} ==", grid.id.title()));
        if grid.is_empty() {
            self.lines.push("   (empty)".to_string());
            return Ok(());
        }
        for row in 0..grid.rows() {
            let start = row * grid.columns;
            let end = (start + grid.columns).min(grid.len());
            let cells: Vec<String> = grid.tiles[start..end]
                .iter()
                .zip(start..)
                .map(|(tile, index)| {
                    let cell = format!("{} {}", icons.resolve(&tile.icon), tile.label);
                    if Highlight::tile(focused == Some(index)).focused {
                        format!(">{cell}<")
                    } else {
                        format!(" {cell} ")
                    }
                })
                .collect();
            self.lines.push(format!("  {}", cells.join(" ")));
        }
        Ok(())
    }

    fn draw_clock(&mut self, face: &ClockFace) -> Result<()> {
        let text = match &face.date {
            Some(date) => format!("{}  {}", face.time, date),
            None => face.time.clone(),
        };
        self.lines.push(if face.corner.is_left() {
            text
        } else {
            format!("{text:>60}")
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::{SectionId, materialize};
    use crate::settings::{Configuration, Corner, Tile};

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Renderer for Recorder {
        fn draw_banner(&mut self, banner: &BannerSection, highlight: Highlight) -> Result<()> {
            self.calls
                .push(format!("banner {} {}", banner.logo, highlight.scale));
            Ok(())
        }

        fn draw_grid(
            &mut self,
            grid: &GridSection,
            focused: Option<usize>,
            _icons: &IconRegistry,
        ) -> Result<()> {
            self.calls.push(format!("grid {:?} {focused:?}", grid.id));
            Ok(())
        }

        fn draw_clock(&mut self, face: &ClockFace) -> Result<()> {
            self.calls.push(format!("clock {}", face.time));
            Ok(())
        }
    }

    fn face(corner: Corner) -> ClockFace {
        ClockFace {
            corner,
            time: "09:05".into(),
            date: None,
        }
    }

    #[test]
    fn highlight_scales() {
        assert_eq!(Highlight::tile(true).scale, 1.10);
        assert_eq!(Highlight::banner(true).scale, 1.01);
        assert_eq!(Highlight::tile(false), Highlight::NONE);
        assert_eq!(Highlight::banner(false).scale, 1.0);
    }

    #[test]
    fn walks_sections_in_order_with_focus() {
        let view = materialize(&Configuration::default());
        let mut rec = Recorder::default();
        let icons = IconRegistry::new();
        render_view(&view, Some(Cursor::new(2, 1)), None, &icons, &mut rec).unwrap();
        assert_eq!(
            rec.calls,
            [
                "banner RedPlay 1",
                "grid System None",
                "grid Entertainment Some(1)",
                "grid Music None",
            ]
        );
    }

    #[test]
    fn clock_position_follows_corner() {
        let view = View::new(vec![]);
        let icons = IconRegistry::new();

        let mut rec = Recorder::default();
        let top = face(Corner::TopLeft);
        render_view(&view, None, Some(&top), &icons, &mut rec).unwrap();
        assert_eq!(rec.calls, ["clock 09:05"]);

        let view = materialize(&Configuration::default());
        let mut rec = Recorder::default();
        let bottom = face(Corner::BottomRight);
        render_view(&view, None, Some(&bottom), &icons, &mut rec).unwrap();
        assert_eq!(rec.calls.last().map(String::as_str), Some("clock 09:05"));
        let mut rec = Recorder::default();
        let top = face(Corner::TopRight);
        render_view(&view, None, Some(&top), &icons, &mut rec).unwrap();
        assert_eq!(rec.calls.first().map(String::as_str), Some("clock 09:05"));
    }

    #[test]
    fn text_frame_marks_focus() {
        let grid = GridSection::new(
            SectionId::Entertainment,
            2,
            vec![
                Tile::new("a", "Alpha", "Tv"),
                Tile::new("b", "Beta", "Music"),
                Tile::new("c", "Gamma", "Nope"),
            ],
        );
        let view = View::new(vec![Section::Grid(grid)]);
        let mut text = TextRenderer::new();
        render_view(
            &view,
            Some(Cursor::new(0, 2)),
            None,
            &IconRegistry::new(),
            &mut text,
        )
        .unwrap();
        let frame = text.take_frame();
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines[0], "== Apps ==");
        assert_eq!(lines[1], "   ▭ Alpha   ♪ Beta ");
        assert_eq!(lines[2], "  >▣ Gamma<");
        assert!(text.lines().is_empty());
    }

    #[test]
    fn text_banner_focus() {
        let view = materialize(&Configuration::default());
        let mut text = TextRenderer::new();
        render_view(
            &view,
            Some(Cursor::new(0, 0)),
            None,
            &IconRegistry::new(),
            &mut text,
        )
        .unwrap();
        assert_eq!(
            text.lines()[0],
            ">> RedPlay | CHEGOU A HORA | DE VOCÊ TER TUDO <<"
        );
    }

    #[test]
    fn text_empty_grid() {
        let view = View::new(vec![Section::Grid(GridSection::new(
            SectionId::Music,
            3,
            vec![],
        ))]);
        let mut text = TextRenderer::new();
        render_view(&view, None, None, &IconRegistry::new(), &mut text).unwrap();
        assert_eq!(text.lines(), ["== Music ==", "   (empty)"]);
    }
}
