//! Spherical (web) Mercator mapping between geographic coordinates and "world pixels".
//!
//! At zoom `z` the whole globe covers a square of `256 * 2^z` pixels, the same grid raster tile
//! servers use, so world pixels line up 1:1 with stitched tile imagery.

use std::f64::consts::{FRAC_PI_4, PI};

use crate::foundation::core::{LonLat, Point, Rect};

/// Edge length of one raster tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// Largest latitude (degrees) the square Mercator world covers.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Side length of the world square at `zoom`, in pixels.
pub fn world_size(zoom: u8) -> f64 {
    f64::from(TILE_SIZE) * 2f64.powi(i32::from(zoom))
}

/// Project `(lon, lat)` to world pixels at `zoom`.
pub fn forward(ll: LonLat, zoom: u8) -> Point {
    let s = world_size(zoom);
    let x = (ll.lon + 180.0) / 360.0 * s;
    let lat_rad = ll.lat.to_radians();
    let y = (1.0 - (FRAC_PI_4 + lat_rad / 2.0).tan().ln() / PI) / 2.0 * s;
    Point::new(x, y)
}

/// Inverse of [`forward`].
pub fn inverse(p: Point, zoom: u8) -> LonLat {
    let s = world_size(zoom);
    let lon = (p.x / s) * 360.0 - 180.0;
    let y = 2.0 * (p.y / s) - 1.0;
    let lat = (2.0 * (-y * PI).exp().atan() - PI / 2.0).to_degrees();
    LonLat::new(lon, lat)
}

/// Project a sequence of coordinates.
pub fn forward_all(points: &[LonLat], zoom: u8) -> Vec<Point> {
    points.iter().map(|&ll| forward(ll, zoom)).collect()
}

/// Axis-aligned bounding box of `points`, or `None` when empty.
pub fn bounds(points: &[Point]) -> Option<Rect> {
    let first = *points.first()?;
    let mut r = Rect::from_points(first, first);
    for &p in &points[1..] {
        r = r.union_pt(p);
    }
    Some(r)
}

#[cfg(test)]
#[path = "../../tests/unit/geo/projection.rs"]
mod tests;
