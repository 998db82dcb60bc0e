use serde_json::Value;

use crate::foundation::core::LonLat;
use crate::foundation::error::{RouteReelError, RouteReelResult};
use crate::geo::projection::MAX_LATITUDE;

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MI: f64 = 3958.7613;

/// An immutable route polyline of at least two `(lon, lat)` vertices.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Route {
    points: Vec<LonLat>,
}

impl Route {
    /// Validate and wrap a polyline.
    pub fn new(points: Vec<LonLat>) -> RouteReelResult<Self> {
        if points.len() < 2 {
            return Err(RouteReelError::validation(format!(
                "route must have at least 2 vertices, got {}",
                points.len()
            )));
        }
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(RouteReelError::malformed_coordinates(format!(
                "route vertex {i} is not finite"
            )));
        }
        if let Some(i) = points
            .iter()
            .position(|p| !(-180.0..=180.0).contains(&p.lon))
        {
            return Err(RouteReelError::malformed_coordinates(format!(
                "route vertex {i} longitude is outside [-180, 180]"
            )));
        }
        if let Some(i) = points
            .iter()
            .position(|p| !(-MAX_LATITUDE..=MAX_LATITUDE).contains(&p.lat))
        {
            return Err(RouteReelError::malformed_coordinates(format!(
                "route vertex {i} latitude is outside the Mercator range +/-{MAX_LATITUDE}"
            )));
        }
        Ok(Self { points })
    }

    /// Extract the route from a GeoJSON document.
    ///
    /// Accepts `FeatureCollection` (first feature), `Feature`, `LineString` and `MultiLineString`
    /// (parts concatenated in order). Extra coordinate dimensions such as altitude are dropped.
    pub fn from_geojson(doc: &Value) -> RouteReelResult<Self> {
        let mut geom = doc;
        match type_of(geom) {
            Some("FeatureCollection") => {
                let first = geom
                    .get("features")
                    .and_then(Value::as_array)
                    .and_then(|f| f.first())
                    .ok_or_else(|| {
                        RouteReelError::unsupported_geometry("empty FeatureCollection")
                    })?;
                geom = first.get("geometry").unwrap_or(&Value::Null);
            }
            Some("Feature") => {
                geom = geom.get("geometry").unwrap_or(&Value::Null);
            }
            _ => {}
        }

        let coords = geom.get("coordinates");
        let points = match type_of(geom) {
            Some("LineString") => parse_line(coords)?,
            Some("MultiLineString") => {
                let parts = coords.and_then(Value::as_array).ok_or_else(|| {
                    RouteReelError::malformed_coordinates(
                        "MultiLineString coordinates must be an array of lines",
                    )
                })?;
                let mut out = Vec::new();
                for part in parts {
                    out.extend(parse_line(Some(part))?);
                }
                out
            }
            other => {
                return Err(RouteReelError::unsupported_geometry(format!(
                    "unsupported geometry type: {}",
                    other.unwrap_or("<missing>")
                )));
            }
        };

        Self::new(points)
    }

    /// Route vertices in order.
    pub fn points(&self) -> &[LonLat] {
        &self.points
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; a route has at least two vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Last vertex.
    pub fn finish(&self) -> LonLat {
        self.points[self.points.len() - 1]
    }

    /// Cumulative great-circle distance in miles at each vertex (first entry is 0).
    pub fn cumulative_miles(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.points.len());
        let mut acc = 0.0;
        out.push(acc);
        for w in self.points.windows(2) {
            acc += haversine_miles(w[0], w[1]);
            out.push(acc);
        }
        out
    }

    /// Locate each distance (miles) on the route by distance, not by vertex index.
    ///
    /// Distances are clamped to the route length and may come in any order.
    pub fn positions_at_distances(&self, distances_mi: &[f64]) -> Vec<LonLat> {
        let cum = self.cumulative_miles();
        let total = cum[cum.len() - 1];
        let max_d = total.max(1e-6);
        let last_seg = cum.len() - 2;

        let mut out = Vec::with_capacity(distances_mi.len());
        for &d in distances_mi {
            let d = d.clamp(0.0, max_d);
            let j = cum.partition_point(|&c| c < d).saturating_sub(1).min(last_seg);
            let (d0, d1) = (cum[j], cum[j + 1]);
            let t = if d1 == d0 {
                0.0
            } else {
                ((d - d0) / (d1 - d0)).clamp(0.0, 1.0)
            };
            out.push(self.points[j].lerp(self.points[j + 1], t));
        }
        out
    }
}

/// Great-circle (haversine) distance between two coordinates, in miles.
pub fn haversine_miles(a: LonLat, b: LonLat) -> f64 {
    let la1 = a.lat.to_radians();
    let la2 = b.lat.to_radians();
    let dlo = (b.lon - a.lon).to_radians();
    let dla = la2 - la1;
    let h = (dla / 2.0).sin().powi(2) + la1.cos() * la2.cos() * (dlo / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MI * h.sqrt().min(1.0).asin()
}

fn type_of(v: &Value) -> Option<&str> {
    v.get("type").and_then(Value::as_str)
}

fn parse_line(coords: Option<&Value>) -> RouteReelResult<Vec<LonLat>> {
    let arr = coords.and_then(Value::as_array).ok_or_else(|| {
        RouteReelError::malformed_coordinates("LineString coordinates must be an array")
    })?;
    let mut out = Vec::with_capacity(arr.len());
    for (i, c) in arr.iter().enumerate() {
        let pos = c.as_array().ok_or_else(|| {
            RouteReelError::malformed_coordinates(format!("coordinate {i} is not an array"))
        })?;
        if pos.len() < 2 {
            return Err(RouteReelError::malformed_coordinates(format!(
                "coordinate {i} has {} components, need at least 2",
                pos.len()
            )));
        }
        let lon = pos[0].as_f64();
        let lat = pos[1].as_f64();
        let (Some(lon), Some(lat)) = (lon, lat) else {
            return Err(RouteReelError::malformed_coordinates(format!(
                "coordinate {i} must contain numbers"
            )));
        };
        out.push(LonLat::new(lon, lat));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/geo/route.rs"]
mod tests;
