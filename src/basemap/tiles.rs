//! Raster tile sources.
//!
//! A source either returns a decoded tile or says it is unavailable. Unavailability (network
//! down, HTTP error status, undecodable body) is an expected outcome that makes the compositor
//! fall back to a flat background. An `Err` is reserved for bugs such as an out-of-range key.

use std::time::Duration;

use crate::foundation::error::{RouteReelError, RouteReelResult};
use crate::foundation::math::premul_rgba8;
use crate::geo::projection::TILE_SIZE;

/// Slippy-map tile address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct TileKey {
    /// Zoom level.
    pub z: u8,
    /// Column, `0..2^z`.
    pub x: u32,
    /// Row, `0..2^z`.
    pub y: u32,
}

impl TileKey {
    /// Number of tiles along one axis at `z`.
    pub fn tiles_per_axis(z: u8) -> u64 {
        1u64 << z
    }

    /// Reject keys outside the tile grid.
    pub fn validate(self) -> RouteReelResult<()> {
        if self.z > 30 {
            return Err(RouteReelError::evaluation(format!(
                "tile zoom {} out of range",
                self.z
            )));
        }
        let n = Self::tiles_per_axis(self.z);
        if u64::from(self.x) >= n || u64::from(self.y) >= n {
            return Err(RouteReelError::evaluation(format!(
                "tile {}/{}/{} outside the {n}x{n} grid",
                self.z, self.x, self.y
            )));
        }
        Ok(())
    }
}

/// Decoded `TILE_SIZE`x`TILE_SIZE` tile as premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileImage {
    pub(crate) rgba: Vec<u8>,
}

impl TileImage {
    /// Wrap premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(rgba: Vec<u8>) -> RouteReelResult<Self> {
        let want = (TILE_SIZE as usize) * (TILE_SIZE as usize) * 4;
        if rgba.len() != want {
            return Err(RouteReelError::evaluation(format!(
                "tile buffer has {} bytes, expected {want}",
                rgba.len()
            )));
        }
        Ok(Self { rgba })
    }

    /// Tile filled with one straight-alpha color.
    pub fn solid(rgba: [u8; 4]) -> Self {
        let px = premul_rgba8(rgba);
        let n = (TILE_SIZE as usize) * (TILE_SIZE as usize);
        Self {
            rgba: px.iter().copied().cycle().take(n * 4).collect(),
        }
    }

    /// Decode an encoded image (PNG, JPEG, ...) of exactly tile size.
    pub fn decode(bytes: &[u8]) -> Result<Self, String> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| format!("tile decode failed: {e}"))?
            .to_rgba8();
        if img.width() != TILE_SIZE || img.height() != TILE_SIZE {
            return Err(format!(
                "tile is {}x{}, expected {TILE_SIZE}x{TILE_SIZE}",
                img.width(),
                img.height()
            ));
        }
        let mut rgba = img.into_raw();
        for px in rgba.chunks_exact_mut(4) {
            let p = premul_rgba8([px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&p);
        }
        Ok(Self { rgba })
    }
}

/// Result of asking a source for one tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TileFetch {
    /// Tile imagery.
    Tile(TileImage),
    /// The source could not deliver this tile; the reason is logged.
    Unavailable(String),
}

/// Something that can produce raster tiles.
pub trait TileSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;
    /// Fetch one tile.
    fn fetch(&self, key: TileKey) -> RouteReelResult<TileFetch>;
}

/// Source that never has tiles; the basemap is always the flat background.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTiles;

impl TileSource for NoTiles {
    fn name(&self) -> &str {
        "none"
    }

    fn fetch(&self, key: TileKey) -> RouteReelResult<TileFetch> {
        key.validate()?;
        Ok(TileFetch::Unavailable("tiles disabled".to_owned()))
    }
}

/// Blocking HTTP source for `{z}/{x}/{y}` URL templates.
#[derive(Debug)]
pub struct HttpTileSource {
    template: String,
    client: reqwest::blocking::Client,
}

impl HttpTileSource {
    /// Create a source for `template`, which must contain `{z}`, `{x}` and `{y}`.
    pub fn new(template: &str, timeout: Duration, user_agent: &str) -> RouteReelResult<Self> {
        for p in ["{z}", "{x}", "{y}"] {
            if !template.contains(p) {
                return Err(RouteReelError::validation(format!(
                    "tile url template is missing '{p}'"
                )));
            }
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| RouteReelError::validation(format!("failed to build http client: {e}")))?;
        Ok(Self {
            template: template.to_owned(),
            client,
        })
    }

    /// Concrete URL for `key`.
    pub fn url_for(&self, key: TileKey) -> String {
        expand_template(&self.template, key)
    }
}

impl TileSource for HttpTileSource {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, key: TileKey) -> RouteReelResult<TileFetch> {
        key.validate()?;
        let url = self.url_for(key);
        let resp = match self.client.get(&url).send() {
            Ok(r) => r,
            Err(e) => return Ok(TileFetch::Unavailable(format!("request failed: {e}"))),
        };
        let status = resp.status();
        if !status.is_success() {
            return Ok(TileFetch::Unavailable(format!("http status {status}")));
        }
        let bytes = match resp.bytes() {
            Ok(b) => b,
            Err(e) => return Ok(TileFetch::Unavailable(format!("body read failed: {e}"))),
        };
        Ok(match TileImage::decode(&bytes) {
            Ok(t) => TileFetch::Tile(t),
            Err(reason) => TileFetch::Unavailable(reason),
        })
    }
}

/// Substitute `{z}`, `{x}`, `{y}` in a tile URL template.
pub fn expand_template(template: &str, key: TileKey) -> String {
    template
        .replace("{z}", &key.z.to_string())
        .replace("{x}", &key.x.to_string())
        .replace("{y}", &key.y.to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/basemap/tiles.rs"]
mod tests;
