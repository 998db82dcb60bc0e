//! Zoom selection.
//!
//! The whole video is rendered from one stitched raster, so the zoom must be coarse enough that a
//! single canvas no larger than [`MAX_CANVAS_SIDE`] covers every crop the camera will take: the
//! dot-centered follow crops and the final fit-whole-route view centered on the finish dot.

use kurbo::Size;

use crate::foundation::core::{Canvas, LonLat, Point};
use crate::geo::projection::{bounds, forward, forward_all};

/// Coarsest zoom the search will return.
pub const MIN_ZOOM: u8 = 4;
/// Most detailed zoom accepted as a request.
pub const MAX_ZOOM: u8 = 22;
/// Hard bound on either side of the stitched basemap, in pixels.
pub const MAX_CANVAS_SIDE: f64 = 7000.0;
/// Extra follow margin beyond half a viewport, as a fraction of the viewport.
pub const FOLLOW_EXTRA: f64 = 0.20;

/// Outcome of [`ZoomQuery::select`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ZoomChoice {
    /// Selected integer zoom.
    pub zoom: u8,
    /// Canvas size both phases need at `zoom`.
    pub required: Size,
    /// `true` when the floor was reached without satisfying the bound; the canvas will be clamped.
    pub degraded: bool,
}

/// Inputs to the zoom search.
#[derive(Clone, Copy, Debug)]
pub struct ZoomQuery<'a> {
    /// Follow-phase dot positions.
    pub frames: &'a [LonLat],
    /// Full route geometry.
    pub route: &'a [LonLat],
    /// Output viewport.
    pub viewport: Canvas,
    /// Fit-view padding as a fraction of the viewport.
    pub padding: f64,
    /// Maximum canvas side.
    pub max_side: f64,
}

impl<'a> ZoomQuery<'a> {
    /// Query with the default canvas bound.
    pub fn new(frames: &'a [LonLat], route: &'a [LonLat], viewport: Canvas, padding: f64) -> Self {
        Self {
            frames,
            route,
            viewport,
            padding,
            max_side: MAX_CANVAS_SIDE,
        }
    }

    /// Canvas needed so every centered follow crop fits without hitting an edge.
    pub fn follow_requirement(&self, zoom: u8) -> Size {
        let pts = forward_all(self.frames, zoom);
        let Some(bb) = bounds(&pts) else {
            return Size::ZERO;
        };
        let mx = f64::from(self.viewport.width) * (0.5 + FOLLOW_EXTRA);
        let my = f64::from(self.viewport.height) * (0.5 + FOLLOW_EXTRA);
        Size::new(bb.width() + 2.0 * mx, bb.height() + 2.0 * my)
    }

    /// Canvas needed to show the whole route, plus padding, around the finish dot.
    pub fn fit_requirement(&self, zoom: u8) -> Size {
        let Some(&last) = self.frames.last() else {
            return Size::ZERO;
        };
        let route = forward_all(self.route, zoom);
        let Some(bb) = bounds(&route) else {
            return Size::ZERO;
        };
        let c = forward(last, zoom);
        let (half_w, half_h) = half_extents_around(c, bb);
        let pad_x = f64::from(self.viewport.width) * self.padding;
        let pad_y = f64::from(self.viewport.height) * self.padding;
        Size::new(2.0 * half_w + 2.0 * pad_x, 2.0 * half_h + 2.0 * pad_y)
    }

    /// Element-wise maximum of the follow and fit requirements.
    pub fn required_at(&self, zoom: u8) -> Size {
        let f = self.follow_requirement(zoom);
        let r = self.fit_requirement(zoom);
        Size::new(f.width.max(r.width), f.height.max(r.height))
    }

    /// Most detailed zoom in `[MIN_ZOOM, requested]` whose requirement fits the canvas bound.
    ///
    /// Walks down one level at a time; the loop visits at most `requested - MIN_ZOOM + 1` levels.
    #[tracing::instrument(skip(self), fields(frames = self.frames.len(), vertices = self.route.len()))]
    pub fn select(&self, requested: u8) -> ZoomChoice {
        let start = requested.clamp(MIN_ZOOM, MAX_ZOOM);
        let mut last = Size::ZERO;
        for zoom in (MIN_ZOOM..=start).rev() {
            let required = self.required_at(zoom);
            tracing::debug!(zoom, w = required.width, h = required.height, "zoom attempt");
            if required.width <= self.max_side && required.height <= self.max_side {
                return ZoomChoice {
                    zoom,
                    required,
                    degraded: false,
                };
            }
            last = required;
        }
        tracing::warn!(
            zoom = MIN_ZOOM,
            w = last.width,
            h = last.height,
            "zoom floor reached; basemap will be clamped"
        );
        ZoomChoice {
            zoom: MIN_ZOOM,
            required: last,
            degraded: true,
        }
    }
}

/// Larger of the two distances from `c` to the box edges, per axis.
pub(crate) fn half_extents_around(c: Point, bb: kurbo::Rect) -> (f64, f64) {
    let hw = (c.x - bb.x0).max(bb.x1 - c.x).max(0.0);
    let hh = (c.y - bb.y0).max(bb.y1 - c.y).max(0.0);
    (hw, hh)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/zoom.rs"]
mod tests;
