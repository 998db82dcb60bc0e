use std::path::Path;

use anyhow::Context as _;
use serde_json::Value;

use crate::foundation::error::RouteReelResult;
use crate::geo::route::Route;
use crate::pace::samples::PaceSamples;
use crate::session::config::VideoConfig;

/// Every n-th vertex contributes to [`route_hash`].
pub const ROUTE_HASH_STRIDE: usize = 10;

/// One video job: route geometry, pace arrays and options in a single JSON document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RouteVideoRequest {
    /// GeoJSON `FeatureCollection`, `Feature`, `LineString` or `MultiLineString`.
    pub geojson: Value,
    /// Cumulative distance per pace sample, in miles.
    pub dist_mi: Vec<f64>,
    /// Speed per pace sample, in mph.
    pub speed_mph: Vec<f64>,
    /// Optional elevation per pace sample, in feet.
    #[serde(default)]
    pub elev_ft: Option<Vec<f64>>,
    /// Human name used for the output file.
    #[serde(default)]
    pub route_name: Option<String>,
    /// Precomputed route hash used for the output file when no name is given.
    #[serde(default)]
    pub route_hash: Option<String>,
    /// Video options, flattened into the top-level object.
    #[serde(flatten)]
    pub config: VideoConfig,
}

impl RouteVideoRequest {
    /// Parse a request from JSON text.
    pub fn from_json_str(s: &str) -> RouteReelResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read and parse a request file.
    pub fn from_path(path: &Path) -> RouteReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read request '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Extract and validate the route.
    pub fn route(&self) -> RouteReelResult<Route> {
        Route::from_geojson(&self.geojson)
    }

    /// Assemble and validate the pace profile.
    pub fn pace(&self) -> RouteReelResult<PaceSamples> {
        PaceSamples::new(
            self.dist_mi.clone(),
            self.speed_mph.clone(),
            self.elev_ft.clone(),
        )
    }

    /// File stem for the output video: name, then the supplied hash, then [`route_hash`].
    pub fn output_stem(&self, route: &Route) -> String {
        [self.route_name.as_deref(), self.route_hash.as_deref()]
            .into_iter()
            .flatten()
            .map(sanitize_stem)
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| route_hash(route))
    }
}

/// Stable hex digest of a route, sampling every [`ROUTE_HASH_STRIDE`]-th vertex.
pub fn route_hash(route: &Route) -> String {
    use std::fmt::Write as _;

    let mut h = xxhash_rust::xxh3::Xxh3::new();
    let mut buf = String::with_capacity(32);
    for p in route.points().iter().step_by(ROUTE_HASH_STRIDE) {
        buf.clear();
        let _ = write!(buf, "{:.6},{:.6};", p.lat, p.lon);
        h.update(buf.as_bytes());
    }
    format!("{:016x}", h.digest())
}

fn sanitize_stem(s: &str) -> String {
    let cleaned: String = s
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_matches('.').to_owned()
}

/// Parse a request and validate everything in it before any rendering.
pub fn load_request(path: &Path) -> RouteReelResult<(RouteVideoRequest, Route, PaceSamples)> {
    let req = RouteVideoRequest::from_path(path)?;
    req.config.validate()?;
    let route = req.route()?;
    let pace = req.pace()?;
    Ok((req, route, pace))
}

#[cfg(test)]
#[path = "../../tests/unit/session/request.rs"]
mod tests;
