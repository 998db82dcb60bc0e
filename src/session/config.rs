use std::path::PathBuf;
use std::time::Duration;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{RouteReelError, RouteReelResult};
use crate::layout::zoom::{MAX_CANVAS_SIDE, MAX_ZOOM, MIN_ZOOM};
use crate::pace::timeline::MAX_FOLLOW_FRAMES;

/// Highest accepted frame rate.
pub const MAX_FPS: u32 = 240;

/// Video options.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Output frame rate.
    pub fps: u32,
    /// Output width in pixels (even).
    pub width: u32,
    /// Output height in pixels (even).
    pub height: u32,
    /// Upper bound on the follow phase, in seconds.
    pub max_seconds: f64,
    /// Use raster tile imagery for the basemap.
    pub map_tiles: bool,
    /// Fit-view padding as a fraction of the viewport.
    pub padding: f64,
    /// Most detailed zoom the selector may pick.
    pub follow_zoom: u8,
    /// Zoom-out duration.
    pub zoom_out_seconds: f64,
    /// Hold on the finish before zooming out.
    pub hold_at_finish_seconds: f64,
    /// Still summary frames after the zoom-out.
    pub final_summary_hold_seconds: f64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            width: 1280,
            height: 720,
            max_seconds: 60.0,
            map_tiles: false,
            padding: 0.05,
            follow_zoom: 14,
            zoom_out_seconds: 2.0,
            hold_at_finish_seconds: 0.6,
            final_summary_hold_seconds: 1.2,
        }
    }
}

impl VideoConfig {
    /// Check every option; called before any work starts.
    pub fn validate(&self) -> RouteReelResult<()> {
        if self.fps == 0 || self.fps > MAX_FPS {
            return Err(RouteReelError::validation(format!(
                "fps must be in 1..={MAX_FPS}, got {}",
                self.fps
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(RouteReelError::validation("width/height must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(RouteReelError::validation(
                "width/height must be even (required for yuv420p output)",
            ));
        }
        if f64::from(self.width) > MAX_CANVAS_SIDE || f64::from(self.height) > MAX_CANVAS_SIDE {
            return Err(RouteReelError::validation(format!(
                "viewport {}x{} exceeds the {MAX_CANVAS_SIDE} px canvas bound",
                self.width, self.height
            )));
        }
        if !(self.max_seconds.is_finite() && self.max_seconds > 0.0) {
            return Err(RouteReelError::validation(
                "max_seconds must be finite and > 0",
            ));
        }
        if self.max_seconds * f64::from(self.fps) > MAX_FOLLOW_FRAMES as f64 {
            return Err(RouteReelError::validation(format!(
                "max_seconds {} at {} fps exceeds the {MAX_FOLLOW_FRAMES} follow-frame limit",
                self.max_seconds, self.fps
            )));
        }
        if !(self.padding.is_finite() && (0.0..0.5).contains(&self.padding)) {
            return Err(RouteReelError::validation("padding must be in [0, 0.5)"));
        }
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&self.follow_zoom) {
            return Err(RouteReelError::validation(format!(
                "follow_zoom must be in {MIN_ZOOM}..={MAX_ZOOM}, got {}",
                self.follow_zoom
            )));
        }
        for (name, v) in [
            ("zoom_out_seconds", self.zoom_out_seconds),
            ("hold_at_finish_seconds", self.hold_at_finish_seconds),
            ("final_summary_hold_seconds", self.final_summary_hold_seconds),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(RouteReelError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }

    /// Validated frame rate.
    pub fn fps(&self) -> RouteReelResult<Fps> {
        Fps::new(self.fps)
    }

    /// Output viewport.
    pub fn viewport(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }
}

/// Where basemap tiles come from when `map_tiles` is on.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TileSourceConfig {
    /// URL template with `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// `User-Agent` header sent to the tile server.
    pub user_agent: String,
}

impl Default for TileSourceConfig {
    fn default() -> Self {
        Self {
            url_template: Self::OSM_HOT.to_owned(),
            timeout_ms: 10_000,
            user_agent: concat!("routereel/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl TileSourceConfig {
    /// Humanitarian OSM tiles, used without an API key.
    pub const OSM_HOT: &'static str = "https://a.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";

    /// MapTiler streets tiles for `key`.
    pub fn maptiler(key: &str) -> Self {
        Self {
            url_template: format!(
                "https://api.maptiler.com/maps/streets/256/{{z}}/{{x}}/{{y}}.png?key={key}"
            ),
            ..Self::default()
        }
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Frame rendering parallelism.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderThreading {
    /// Render chunks of frames on the rayon pool.
    pub parallel: bool,
    /// Frames rendered per chunk before they are handed to the sink in order.
    pub chunk_size: usize,
    /// Worker threads; `None` lets rayon decide.
    pub threads: Option<usize>,
    /// Render frames with an identical camera and HUD once per chunk and reuse the pixels.
    pub static_frame_elision: bool,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            static_frame_elision: false,
        }
    }
}

/// Output and execution options for an MP4 render.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineOpts {
    /// Directory the video is written into.
    pub out_dir: PathBuf,
    /// File name override; defaults to `<name>.mp4` from the request.
    pub file_name: Option<String>,
    /// Replace an existing file.
    pub overwrite: bool,
    /// Bound on waiting for the encoder after the last frame.
    pub encoder_timeout: Duration,
    /// Frame rendering parallelism.
    pub threading: RenderThreading,
}

impl PipelineOpts {
    /// Defaults writing into `out_dir`.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            file_name: None,
            overwrite: true,
            encoder_timeout: Duration::from_secs(300),
            threading: RenderThreading::default(),
        }
    }

    /// `out_dir/<file_name>` when set, else `out_dir/<stem>.mp4`.
    pub fn output_path(&self, stem: &str) -> PathBuf {
        match &self.file_name {
            Some(name) => self.out_dir.join(name),
            None => self.out_dir.join(format!("{stem}.mp4")),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
