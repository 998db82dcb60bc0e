//! The single stitched raster every frame is cropped from.
//!
//! Built once per video at the chosen zoom. Tile imagery is used when the source can deliver
//! every tile the canvas touches; otherwise the whole canvas is a flat background. A faint copy
//! of the full route is drawn on top either way.

use std::sync::Arc;

use rayon::prelude::*;

use crate::basemap::tiles::{TileFetch, TileKey, TileSource};
use crate::foundation::core::{Canvas, LonLat, Point};
use crate::foundation::error::{RouteReelError, RouteReelResult};
use crate::geo::projection::{TILE_SIZE, bounds, forward, forward_all};
use crate::layout::zoom::ZoomChoice;
use crate::render::raster::{VectorLayer, blit_over, solid};
use crate::render::text::{PanelSpec, TextRasterizer};

/// Flat background color (straight RGBA).
pub const BACKGROUND_RGBA: [u8; 4] = [242, 245, 248, 255];
/// Attribution shown on tiled basemaps.
pub const ATTRIBUTION: &str = "© OpenStreetMap • © MapTiler";
/// Reference route line color.
pub const REFERENCE_LINE_RGBA: [u8; 4] = [0, 0, 255, 110];
/// Reference route line width.
pub const REFERENCE_LINE_WIDTH: f64 = 2.0;

const ATTRIBUTION_MARGIN: i64 = 8;
const ATTRIBUTION_HEIGHT: u32 = 20;
const ATTRIBUTION_CHAR_WIDTH: f64 = 6.0;

/// Canvas size for a zoom requirement: at least the viewport, at most `max_side`, per axis.
pub fn canvas_size(required: kurbo::Size, viewport: Canvas, max_side: f64) -> Canvas {
    let side = |req: f64, view: u32| req.max(f64::from(view)).min(max_side).max(1.0) as u32;
    Canvas {
        width: side(required.width, viewport.width),
        height: side(required.height, viewport.height),
    }
}

/// Immutable stitched basemap anchored in world-pixel space.
#[derive(Clone)]
pub struct Basemap {
    zoom: u8,
    origin: Point,
    size: Canvas,
    rgba: Arc<Vec<u8>>,
    tiled: bool,
}

impl std::fmt::Debug for Basemap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Basemap")
            .field("zoom", &self.zoom)
            .field("origin", &self.origin)
            .field("size", &self.size)
            .field("tiled", &self.tiled)
            .finish_non_exhaustive()
    }
}

impl Basemap {
    /// Build the basemap for `choice`, centered on the bounding box of the follow positions.
    #[tracing::instrument(skip_all, fields(zoom = choice.zoom, source = tiles.name()))]
    pub fn build(
        choice: &ZoomChoice,
        frames: &[LonLat],
        route: &[LonLat],
        viewport: Canvas,
        max_side: f64,
        tiles: &dyn TileSource,
        text: &TextRasterizer,
    ) -> RouteReelResult<Self> {
        let zoom = choice.zoom;
        let size = canvas_size(choice.required, viewport, max_side);
        let follow = bounds(&forward_all(frames, zoom))
            .ok_or_else(|| RouteReelError::validation("basemap needs at least one frame"))?;
        let center = follow.center();
        let origin = Point::new(
            (center.x - f64::from(size.width) / 2.0).round(),
            (center.y - f64::from(size.height) / 2.0).round(),
        );

        let (mut rgba, tiled) = match stitch_tiles(origin, size, zoom, tiles)? {
            Some(px) => (px, true),
            None => (solid(size, BACKGROUND_RGBA), false),
        };

        let mut map = Self {
            zoom,
            origin,
            size,
            rgba: Arc::new(Vec::new()),
            tiled,
        };

        let mut layer = VectorLayer::new(size)?;
        layer.stroke_polyline(
            &map.project_all(route),
            REFERENCE_LINE_WIDTH,
            REFERENCE_LINE_RGBA,
        );
        layer.composite_onto(&mut rgba)?;

        if tiled {
            draw_attribution(&mut rgba, size, text)?;
        }

        map.rgba = Arc::new(rgba);
        tracing::info!(
            w = size.width,
            h = size.height,
            tiled,
            "built basemap"
        );
        Ok(map)
    }

    /// Zoom the basemap was stitched at.
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// World-pixel coordinate of the basemap's top-left corner.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Basemap dimensions.
    pub fn size(&self) -> Canvas {
        self.size
    }

    /// Premultiplied RGBA8 pixels.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// `true` when tile imagery was used.
    pub fn is_tiled(&self) -> bool {
        self.tiled
    }

    /// Basemap pixel of a coordinate.
    pub fn project(&self, ll: LonLat) -> Point {
        let w = forward(ll, self.zoom);
        Point::new(w.x - self.origin.x, w.y - self.origin.y)
    }

    /// Basemap pixels of a coordinate sequence.
    pub fn project_all(&self, lls: &[LonLat]) -> Vec<Point> {
        lls.iter().map(|&ll| self.project(ll)).collect()
    }
}

/// Fetch and place every tile the canvas touches, or `None` if any tile is unavailable.
fn stitch_tiles(
    origin: Point,
    size: Canvas,
    zoom: u8,
    tiles: &dyn TileSource,
) -> RouteReelResult<Option<Vec<u8>>> {
    let ts = f64::from(TILE_SIZE);
    let n = TileKey::tiles_per_axis(zoom) as i64;
    let tx0 = (origin.x / ts).floor() as i64;
    let tx1 = ((origin.x + f64::from(size.width)) / ts).ceil() as i64;
    let ty0 = ((origin.y / ts).floor() as i64).max(0);
    let ty1 = (((origin.y + f64::from(size.height)) / ts).ceil() as i64).min(n);

    let mut wanted = Vec::new();
    for ty in ty0..ty1 {
        for tx in tx0..tx1 {
            // Columns wrap around the antimeridian; rows are clipped at the poles.
            let key = TileKey {
                z: zoom,
                x: tx.rem_euclid(n) as u32,
                y: ty as u32,
            };
            wanted.push((tx, ty, key));
        }
    }
    tracing::debug!(tiles = wanted.len(), "fetching tiles");

    let fetched = wanted
        .par_iter()
        .map(|&(_, _, key)| tiles.fetch(key))
        .collect::<RouteReelResult<Vec<_>>>()?;

    let tile_canvas = Canvas {
        width: TILE_SIZE,
        height: TILE_SIZE,
    };
    let mut canvas = solid(size, BACKGROUND_RGBA);
    for (&(tx, ty, key), fetch) in wanted.iter().zip(fetched) {
        match fetch {
            TileFetch::Tile(img) => {
                let x = tx * i64::from(TILE_SIZE) - origin.x as i64;
                let y = ty * i64::from(TILE_SIZE) - origin.y as i64;
                blit_over(&mut canvas, size, &img.rgba, tile_canvas, x, y)?;
            }
            TileFetch::Unavailable(reason) => {
                tracing::warn!(
                    z = key.z,
                    x = key.x,
                    y = key.y,
                    %reason,
                    "tile unavailable; using flat background"
                );
                return Ok(None);
            }
        }
    }
    Ok(Some(canvas))
}

fn draw_attribution(rgba: &mut [u8], size: Canvas, text: &TextRasterizer) -> RouteReelResult<()> {
    let chars = ATTRIBUTION.chars().count() as f64;
    let tag = Canvas {
        width: (ATTRIBUTION_CHAR_WIDTH * chars) as u32 + 8,
        height: ATTRIBUTION_HEIGHT,
    };
    let panel = text.render_panel(&PanelSpec {
        size: tag,
        lines: vec![ATTRIBUTION.to_owned()],
        pad_x: 4.0,
        pad_y: 4.0,
        line_height: 12.0,
        font_size: 10.0,
        outline: false,
    })?;
    let x = i64::from(size.width) - i64::from(tag.width) - ATTRIBUTION_MARGIN;
    let y = i64::from(size.height) - i64::from(tag.height) - ATTRIBUTION_MARGIN;
    blit_over(rgba, size, &panel, tag, x, y)
}

#[cfg(test)]
#[path = "../../tests/unit/basemap/compositor.rs"]
mod tests;
