/// Spherical-Mercator world-pixel projection.
pub mod projection;
/// Route polyline model, GeoJSON extraction and great-circle distances.
pub mod route;
