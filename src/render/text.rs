//! Text panels rasterized through `usvg`/`resvg`.
//!
//! A panel is a filled (optionally outlined) box with left-aligned lines of text. Each panel is
//! emitted as a tiny SVG document and rendered into a premultiplied RGBA8 buffer, reusing one
//! shared font database for every frame.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::Canvas;
use crate::foundation::error::{RouteReelError, RouteReelResult};

/// Layout of one text panel in panel-local pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelSpec {
    /// Panel size.
    pub size: Canvas,
    /// Lines, top to bottom.
    pub lines: Vec<String>,
    /// Left inset of the text.
    pub pad_x: f64,
    /// Top inset of the first line box.
    pub pad_y: f64,
    /// Distance between consecutive line tops.
    pub line_height: f64,
    /// Font size in pixels.
    pub font_size: f64,
    /// Draw a 1px black border.
    pub outline: bool,
}

/// Shared font database plus the resolver used for every panel.
#[derive(Clone)]
pub struct TextRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for TextRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRasterizer")
            .field("faces", &self.face_count())
            .finish()
    }
}

impl TextRasterizer {
    /// Load the system fonts.
    pub fn with_system_fonts() -> Self {
        Self::with_font_dirs(&[])
    }

    /// Load the system fonts plus every `.ttf`/`.otf`/`.ttc` directly inside `dirs`.
    pub fn with_font_dirs(dirs: &[&Path]) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        for dir in dirs {
            load_fonts_from_dir(&mut db, dir);
        }
        tracing::debug!(faces = db.len(), "loaded font database");
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// No fonts at all: panels render their boxes and skip the glyphs.
    ///
    /// Output does not depend on the host's installed fonts, which is what pixel tests want.
    pub fn empty() -> Self {
        Self {
            fontdb: Arc::new(usvg::fontdb::Database::new()),
        }
    }

    /// Number of loaded font faces.
    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Rasterize `panel` to premultiplied RGBA8 of exactly `panel.size`.
    pub fn render_panel(&self, panel: &PanelSpec) -> RouteReelResult<Vec<u8>> {
        if panel.size.width == 0 || panel.size.height == 0 {
            return Err(RouteReelError::evaluation("panel size must be non-zero"));
        }
        let svg = panel_svg(panel);
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            font_resolver: make_font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts).with_context(|| "parse panel svg")?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(panel.size.width, panel.size.height)
            .ok_or_else(|| RouteReelError::evaluation("failed to allocate panel pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        Ok(pixmap.take())
    }
}

fn panel_svg(panel: &PanelSpec) -> String {
    use std::fmt::Write as _;

    let (w, h) = (panel.size.width, panel.size.height);
    let mut svg = String::with_capacity(256 + 96 * panel.lines.len());
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    if panel.outline {
        let _ = write!(
            svg,
            r##"<rect x="0.5" y="0.5" width="{}" height="{}" fill="#ffffff" stroke="#000000" stroke-width="1" shape-rendering="crispEdges"/>"##,
            f64::from(w) - 1.0,
            f64::from(h) - 1.0
        );
    } else {
        let _ = write!(
            svg,
            r##"<rect x="0" y="0" width="{w}" height="{h}" fill="#ffffff"/>"##
        );
    }
    let _ = write!(
        svg,
        r##"<g font-family="DejaVu Sans, Arial, sans-serif" font-size="{}" fill="#000000">"##,
        panel.font_size
    );
    for (i, line) in panel.lines.iter().enumerate() {
        // Baseline sits one font size below the line top.
        let y = panel.pad_y + panel.line_height * i as f64 + panel.font_size;
        let _ = write!(
            svg,
            r#"<text x="{}" y="{y}" xml:space="preserve">{}</text>"#,
            panel.pad_x,
            escape_xml(line)
        );
    }
    svg.push_str("</g></svg>");
    svg
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

/// Prefer the requested families, then any sans/serif/mono face, then whatever face exists.
fn make_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);
            families.push(usvg::fontdb::Family::Serif);
            families.push(usvg::fontdb::Family::Monospace);

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            };
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
