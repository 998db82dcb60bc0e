//! Heads-up statistics panel.
//!
//! The panel is sized purely from its content and always drawn at the same top-left corner, so
//! switching between live and summary mode never moves it.

use crate::foundation::core::Canvas;
use crate::foundation::error::RouteReelResult;
use crate::pace::timeline::{HudSample, RouteSummary};
use crate::render::raster::blit_over;
use crate::render::text::{PanelSpec, TextRasterizer};

/// Panel top-left corner in output pixels.
pub const HUD_ORIGIN: (i64, i64) = (10, 10);
/// Vertical advance per line.
pub const LINE_HEIGHT: f64 = 18.0;
/// Horizontal text inset.
pub const PAD_X: f64 = 10.0;
/// Vertical text inset.
pub const PAD_Y: f64 = 8.0;
/// Estimated advance per character used for sizing.
pub const CHAR_WIDTH: f64 = 7.2;
/// Font size of the panel text.
pub const FONT_SIZE: f64 = 12.0;

/// What the panel shows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HudContent {
    /// Instantaneous values during FOLLOW and HOLD.
    Live(HudSample),
    /// Whole-route values during ZOOM_OUT and FINAL_HOLD.
    Summary(RouteSummary),
}

impl HudContent {
    /// Text lines, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Live(s) => {
                let mut lines = vec![
                    format!("Distance: {:.2} mi", s.distance_mi),
                    format!("Speed: {:.1} mph", s.speed_mph),
                ];
                if let Some(e) = s.elevation_ft.filter(|e| e.is_finite()) {
                    lines.push(format!("Elevation: {e:.0} ft"));
                }
                lines
            }
            Self::Summary(s) => {
                let mut lines = vec![
                    "Summary".to_owned(),
                    format!("Total distance: {:.2} mi", s.total_distance_mi),
                    format!("Average Speed: {:.1} mph", s.average_speed_mph),
                ];
                if let Some(e) = s.average_elevation_ft.filter(|e| e.is_finite()) {
                    lines.push(format!("Average Elevation: {e:.0} ft"));
                }
                lines
            }
        }
    }
}

/// Panel size for `lines`: width from the longest line, height from the line count.
pub fn panel_size(lines: &[String]) -> Canvas {
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    Canvas {
        width: (CHAR_WIDTH * longest as f64) as u32 + (2.0 * PAD_X) as u32,
        height: (LINE_HEIGHT * lines.len() as f64) as u32 + (2.0 * PAD_Y) as u32,
    }
}

/// Draw the panel for `content` onto an output-sized premultiplied frame.
pub fn draw_hud(
    frame: &mut [u8],
    out: Canvas,
    content: &HudContent,
    text: &TextRasterizer,
) -> RouteReelResult<()> {
    let lines = content.lines();
    let size = panel_size(&lines);
    let panel = text.render_panel(&PanelSpec {
        size,
        lines,
        pad_x: PAD_X,
        pad_y: PAD_Y,
        line_height: LINE_HEIGHT,
        font_size: FONT_SIZE,
        outline: true,
    })?;
    blit_over(frame, out, &panel, size, HUD_ORIGIN.0, HUD_ORIGIN.1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/hud.rs"]
mod tests;
