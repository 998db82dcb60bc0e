//! Frame renderer: a pure function from frame index to pixels.
//!
//! Every frame is a crop of the shared basemap resampled to the viewport, with the trail walked
//! so far, the dot, and the HUD drawn on top in output pixels. Nothing is cached between frames.

use crate::basemap::compositor::Basemap;
use crate::foundation::core::{Canvas, FrameIndex, Point, Rect};
use crate::foundation::error::{RouteReelError, RouteReelResult};
use crate::geo::projection::bounds;
use crate::geo::route::Route;
use crate::layout::camera::{CropRect, fit_view_size, zoom_view_size};
use crate::pace::timeline::{FrameTimeline, HudSample, RouteSummary};
use crate::render::backend::FrameRGBA;
use crate::render::hud::{HudContent, draw_hud};
use crate::render::phase::{Phase, PhasePlan};
use crate::render::raster::{VectorLayer, crop_resampled};
use crate::render::text::TextRasterizer;

/// Trail color.
pub const TRAIL_RGBA: [u8; 4] = [14, 165, 233, 255];
/// Trail width in output pixels.
pub const TRAIL_WIDTH: f64 = 6.0;
/// Dot fill.
pub const DOT_RGBA: [u8; 4] = [220, 38, 38, 255];
/// Dot radius in output pixels.
pub const DOT_RADIUS: f64 = 6.0;
/// Dot outline color.
pub const DOT_RING_RGBA: [u8; 4] = [255, 255, 255, 255];
/// Dot outline width.
pub const DOT_RING_WIDTH: f64 = 2.0;

/// Camera state resolved for one frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FrameCamera {
    /// Phase of the frame.
    pub phase: Phase,
    /// Follow-timeline entry the dot sits on.
    pub dot_index: usize,
    /// Basemap window that is resampled to the viewport.
    pub crop: CropRect,
}

/// Everything needed to render any frame, immutable after construction.
#[derive(Clone, Debug)]
pub struct FrameRenderer {
    basemap: Basemap,
    trail: Vec<Point>,
    route_bounds: Rect,
    fit_size: Canvas,
    hud: Vec<HudSample>,
    summary: RouteSummary,
    phases: PhasePlan,
    viewport: Canvas,
    text: TextRasterizer,
}

impl FrameRenderer {
    /// Bind a basemap to the timeline it was built for.
    pub fn new(
        basemap: Basemap,
        timeline: &FrameTimeline,
        route: &Route,
        phases: PhasePlan,
        viewport: Canvas,
        padding: f64,
        text: TextRasterizer,
    ) -> RouteReelResult<Self> {
        if timeline.is_empty() {
            return Err(RouteReelError::validation("frame timeline is empty"));
        }
        if phases.follow != timeline.len() as u64 {
            return Err(RouteReelError::evaluation(format!(
                "phase plan has {} follow frames but timeline has {}",
                phases.follow,
                timeline.len()
            )));
        }
        let trail = basemap.project_all(timeline.positions());
        let route_bounds = bounds(&basemap.project_all(route.points()))
            .ok_or_else(|| RouteReelError::validation("route has no vertices"))?;
        let finish = trail[trail.len() - 1];
        let fit_size = fit_view_size(finish, route_bounds, viewport, padding, basemap.size());
        Ok(Self {
            basemap,
            trail,
            route_bounds,
            fit_size,
            hud: timeline.hud().to_vec(),
            summary: timeline.summary(),
            phases,
            viewport,
            text,
        })
    }

    /// Phase lengths.
    pub fn phases(&self) -> PhasePlan {
        self.phases
    }

    /// Output viewport.
    pub fn viewport(&self) -> Canvas {
        self.viewport
    }

    /// Viewport size used once the zoom-out completes.
    pub fn fit_size(&self) -> Canvas {
        self.fit_size
    }

    /// Route bounding box in basemap pixels.
    pub fn route_bounds(&self) -> Rect {
        self.route_bounds
    }

    /// Shared basemap.
    pub fn basemap(&self) -> &Basemap {
        &self.basemap
    }

    /// Resolve phase, dot and crop for `idx`.
    pub fn camera_at(&self, idx: FrameIndex) -> RouteReelResult<FrameCamera> {
        let phase = self.phases.phase_at(idx).ok_or_else(|| {
            RouteReelError::validation(format!(
                "frame {} is past the last frame ({})",
                idx.0,
                self.phases.total_frames()
            ))
        })?;
        let last = self.trail.len() - 1;
        let (dot_index, view) = match phase {
            Phase::Follow { index } => (index.min(last), self.viewport),
            Phase::Hold => (last, self.viewport),
            Phase::ZoomOut { progress } => {
                (last, zoom_view_size(self.viewport, self.fit_size, progress))
            }
            Phase::FinalHold => (last, self.fit_size),
        };
        let crop = CropRect::centered(self.trail[dot_index], view, self.basemap.size());
        Ok(FrameCamera {
            phase,
            dot_index,
            crop,
        })
    }

    /// Render frame `idx`. Identical inputs always yield identical bytes.
    pub fn render_frame(&self, idx: FrameIndex) -> RouteReelResult<FrameRGBA> {
        let cam = self.camera_at(idx)?;
        let out = self.viewport;
        let mut px = crop_resampled(self.basemap.rgba(), self.basemap.size(), cam.crop, out)?;

        let mut layer = VectorLayer::new(out)?;
        if cam.dot_index > 0 {
            let walked: Vec<Point> = self.trail[..=cam.dot_index]
                .iter()
                .map(|&p| cam.crop.to_output(p, out))
                .collect();
            layer.stroke_polyline(&walked, TRAIL_WIDTH, TRAIL_RGBA);
        }
        layer.dot(
            cam.crop.to_output(self.trail[cam.dot_index], out),
            DOT_RADIUS,
            DOT_RGBA,
            Some((DOT_RING_WIDTH, DOT_RING_RGBA)),
        );
        layer.composite_onto(&mut px)?;

        let content = match cam.phase {
            Phase::Follow { .. } | Phase::Hold => HudContent::Live(self.hud[cam.dot_index]),
            Phase::ZoomOut { .. } | Phase::FinalHold => HudContent::Summary(self.summary),
        };
        draw_hud(&mut px, out, &content, &self.text)?;

        Ok(FrameRGBA {
            width: out.width,
            height: out.height,
            data: px,
            premultiplied: true,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
