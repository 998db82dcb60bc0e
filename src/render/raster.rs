//! CPU raster helpers shared by the basemap compositor and the frame renderer.
//!
//! All buffers are tightly packed premultiplied RGBA8.

use kurbo::Shape as _;

use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{RouteReelError, RouteReelResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8, premul_rgba8};
use crate::layout::camera::CropRect;

/// Source-over composite `src` onto `dst` (equal-size buffers).
pub(crate) fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> RouteReelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(RouteReelError::evaluation(
            "premul_over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = s[3] as u16;
        if sa == 0 {
            continue;
        }
        if sa == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255u16 - sa;
        d[3] = add_sat_u8(sa as u8, mul_div255_u8(d[3] as u16, inv));
        for c in 0..3 {
            let dc = mul_div255_u8(d[c] as u16, inv);
            d[c] = add_sat_u8(s[c], dc);
        }
    }
    Ok(())
}

/// Source-over composite a smaller image onto `dst` with its top-left at `(x, y)`, clipped.
pub(crate) fn blit_over(
    dst: &mut [u8],
    dst_size: Canvas,
    src: &[u8],
    src_size: Canvas,
    x: i64,
    y: i64,
) -> RouteReelResult<()> {
    if dst.len() != dst_size.rgba_len() || src.len() != src_size.rgba_len() {
        return Err(RouteReelError::evaluation(
            "blit_over buffer length does not match its size",
        ));
    }
    let dw = i64::from(dst_size.width);
    let dh = i64::from(dst_size.height);
    let sw = i64::from(src_size.width);
    let sh = i64::from(src_size.height);

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + sw).min(dw);
    let y1 = (y + sh).min(dh);
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }
    let run = ((x1 - x0) * 4) as usize;
    for dy in y0..y1 {
        let sy = dy - y;
        let sx = x0 - x;
        let di = ((dy * dw + x0) * 4) as usize;
        let si = ((sy * sw + sx) * 4) as usize;
        premul_over_in_place(&mut dst[di..di + run], &src[si..si + run])?;
    }
    Ok(())
}

/// Fill a buffer with one straight-alpha color.
pub(crate) fn solid(size: Canvas, rgba: [u8; 4]) -> Vec<u8> {
    let px = premul_rgba8(rgba);
    let mut out = vec![0u8; size.rgba_len()];
    for d in out.chunks_exact_mut(4) {
        d.copy_from_slice(&px);
    }
    out
}

/// Cut `crop` out of `src` and resample it to `out` (bilinear when sizes differ).
pub(crate) fn crop_resampled(
    src: &[u8],
    src_size: Canvas,
    crop: CropRect,
    out: Canvas,
) -> RouteReelResult<Vec<u8>> {
    if src.len() != src_size.rgba_len() {
        return Err(RouteReelError::evaluation(
            "crop source length does not match its size",
        ));
    }
    if crop.x0 + crop.width > src_size.width || crop.y0 + crop.height > src_size.height {
        return Err(RouteReelError::evaluation(format!(
            "crop {crop:?} exceeds source {}x{}",
            src_size.width, src_size.height
        )));
    }

    let sw = src_size.width as usize;
    let mut dst = vec![0u8; out.rgba_len()];

    if crop.width == out.width && crop.height == out.height {
        let run = out.width as usize * 4;
        for row in 0..out.height as usize {
            let si = ((crop.y0 as usize + row) * sw + crop.x0 as usize) * 4;
            let di = row * run;
            dst[di..di + run].copy_from_slice(&src[si..si + run]);
        }
        return Ok(dst);
    }

    let sx = f64::from(crop.width) / f64::from(out.width);
    let sy = f64::from(crop.height) / f64::from(out.height);
    let max_x = f64::from(crop.width - 1);
    let max_y = f64::from(crop.height - 1);

    for oy in 0..out.height {
        let fy = ((f64::from(oy) + 0.5) * sy - 0.5).clamp(0.0, max_y);
        let y0 = fy.floor();
        let ty = fy - y0;
        let y0 = y0 as usize;
        let y1 = (y0 + 1).min(crop.height as usize - 1);
        for ox in 0..out.width {
            let fx = ((f64::from(ox) + 0.5) * sx - 0.5).clamp(0.0, max_x);
            let x0 = fx.floor();
            let tx = fx - x0;
            let x0 = x0 as usize;
            let x1 = (x0 + 1).min(crop.width as usize - 1);

            let at = |x: usize, y: usize| {
                ((crop.y0 as usize + y) * sw + crop.x0 as usize + x) * 4
            };
            let (i00, i10, i01, i11) = (at(x0, y0), at(x1, y0), at(x0, y1), at(x1, y1));
            let di = ((oy as usize) * (out.width as usize) + ox as usize) * 4;
            for c in 0..4 {
                let top = f64::from(src[i00 + c]) * (1.0 - tx) + f64::from(src[i10 + c]) * tx;
                let bot = f64::from(src[i01 + c]) * (1.0 - tx) + f64::from(src[i11 + c]) * tx;
                dst[di + c] = (top * (1.0 - ty) + bot * ty).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    Ok(dst)
}

/// Vector overlay layer rasterized with `vello_cpu` and composited onto an RGBA buffer.
pub(crate) struct VectorLayer {
    ctx: vello_cpu::RenderContext,
    size: Canvas,
}

impl VectorLayer {
    pub(crate) fn new(size: Canvas) -> RouteReelResult<Self> {
        let (w, h) = to_u16(size)?;
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.reset();
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(Self { ctx, size })
    }

    /// Stroke an open polyline with round caps and joins.
    ///
    /// Points closer than half a pixel to the previously kept point are skipped.
    pub(crate) fn stroke_polyline(&mut self, pts: &[Point], width: f64, rgba: [u8; 4]) {
        let mut path = kurbo::BezPath::new();
        let mut last: Option<Point> = None;
        for (i, &p) in pts.iter().enumerate() {
            match last {
                None => path.move_to(p),
                Some(l) if i + 1 < pts.len() && (p - l).hypot2() < 0.25 => continue,
                Some(_) => path.line_to(p),
            }
            last = Some(p);
        }
        if path.elements().len() < 2 {
            return;
        }
        let style = kurbo::Stroke::new(width)
            .with_caps(kurbo::Cap::Round)
            .with_join(kurbo::Join::Round);
        let outline = kurbo::stroke(path, &style, &kurbo::StrokeOpts::default(), 0.1);
        self.fill(&outline, rgba);
    }

    /// Filled disc with an optional outline ring.
    pub(crate) fn dot(&mut self, c: Point, r: f64, fill: [u8; 4], ring: Option<(f64, [u8; 4])>) {
        if let Some((ring_w, ring_rgba)) = ring {
            self.fill(&kurbo::Circle::new(c, r + ring_w / 2.0).to_path(0.05), ring_rgba);
            self.fill(&kurbo::Circle::new(c, r - ring_w / 2.0).to_path(0.05), fill);
        } else {
            self.fill(&kurbo::Circle::new(c, r).to_path(0.05), fill);
        }
    }

    fn fill(&mut self, path: &kurbo::BezPath, rgba: [u8; 4]) {
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            rgba[0], rgba[1], rgba[2], rgba[3],
        ));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Rasterize everything drawn so far and composite it over `dst`.
    pub(crate) fn composite_onto(mut self, dst: &mut [u8]) -> RouteReelResult<()> {
        if dst.len() != self.size.rgba_len() {
            return Err(RouteReelError::evaluation(
                "vector layer target does not match layer size",
            ));
        }
        let (w, h) = to_u16(self.size)?;
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        premul_over_in_place(dst, pixmap.data_as_u8_slice())
    }
}

fn to_u16(size: Canvas) -> RouteReelResult<(u16, u16)> {
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| RouteReelError::evaluation("layer width exceeds u16"))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| RouteReelError::evaluation("layer height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(RouteReelError::evaluation("layer size must be non-zero"));
    }
    Ok((w, h))
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
