use crate::foundation::core::{Canvas, Point, Rect};
use crate::layout::zoom::half_extents_around;

/// Integer crop window inside the basemap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct CropRect {
    /// Left edge in basemap pixels.
    pub x0: u32,
    /// Top edge in basemap pixels.
    pub y0: u32,
    /// Crop width.
    pub width: u32,
    /// Crop height.
    pub height: u32,
}

impl CropRect {
    /// Crop of `size` centered on `center`, clamped to the map by shifting its origin.
    ///
    /// The crop is never padded: when the requested size exceeds the map it is shrunk to the map.
    pub fn centered(center: Point, size: Canvas, map: Canvas) -> Self {
        let width = size.width.clamp(1, map.width.max(1));
        let height = size.height.clamp(1, map.height.max(1));
        let x0 = (center.x - f64::from(width) / 2.0).round();
        let y0 = (center.y - f64::from(height) / 2.0).round();
        let max_x = f64::from(map.width - width);
        let max_y = f64::from(map.height - height);
        Self {
            x0: x0.clamp(0.0, max_x) as u32,
            y0: y0.clamp(0.0, max_y) as u32,
            width,
            height,
        }
    }

    /// Map a basemap pixel into output pixels when this crop is resampled to `out`.
    pub fn to_output(self, p: Point, out: Canvas) -> Point {
        let sx = f64::from(out.width) / f64::from(self.width);
        let sy = f64::from(out.height) / f64::from(self.height);
        Point::new(
            (p.x - f64::from(self.x0)) * sx,
            (p.y - f64::from(self.y0)) * sy,
        )
    }

    /// Output-pixels per basemap pixel along x.
    pub fn scale_x(self, out: Canvas) -> f64 {
        f64::from(out.width) / f64::from(self.width)
    }
}

/// Viewport size that contains `route_bounds` plus padding around a fixed `center`.
///
/// Never smaller than the output viewport and never larger than the map.
pub fn fit_view_size(
    center: Point,
    route_bounds: Rect,
    viewport: Canvas,
    padding: f64,
    map: Canvas,
) -> Canvas {
    let (hw, hh) = half_extents_around(center, route_bounds);
    let pad_x = f64::from(viewport.width) * padding;
    let pad_y = f64::from(viewport.height) * padding;
    let w = (2.0 * hw + 2.0 * pad_x).max(f64::from(viewport.width));
    let h = (2.0 * hh + 2.0 * pad_y).max(f64::from(viewport.height));
    Canvas {
        width: (w as u32).min(map.width),
        height: (h as u32).min(map.height),
    }
}

/// Quadratic ease-out: `1 - (1 - a)^2`.
pub fn ease_out_quad(a: f64) -> f64 {
    let a = a.clamp(0.0, 1.0);
    1.0 - (1.0 - a) * (1.0 - a)
}

/// Viewport size at eased progress `a` between the follow size and the fit size.
pub fn zoom_view_size(from: Canvas, to: Canvas, a: f64) -> Canvas {
    let e = ease_out_quad(a);
    let mix = |x: u32, y: u32| ((1.0 - e) * f64::from(x) + e * f64::from(y)).round() as u32;
    Canvas {
        width: mix(from.width, to.width).max(1),
        height: mix(from.height, to.height).max(1),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/camera.rs"]
mod tests;
