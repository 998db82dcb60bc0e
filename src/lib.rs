//! routereel turns a route polyline and a predicted pace profile into a follow-cam video.
//!
//! The pipeline is prepare-once, render-many:
//!
//! - Load a [`Route`] and [`PaceSamples`] (or a whole [`RouteVideoRequest`])
//! - Call [`RouteVideo::prepare`] to pace the follow phase, pick a zoom and stitch the basemap
//! - Render single frames or stream a range into a [`FrameSink`] such as [`FfmpegSink`]
#![forbid(unsafe_code)]

mod foundation;

/// Stitched basemap and tile sources.
pub mod basemap;
/// Encoding sinks.
pub mod encode;
/// Geographic projection and route geometry.
pub mod geo;
/// Zoom selection and camera crops.
pub mod layout;
/// Pace samples and the follow-phase timeline.
pub mod pace;
/// Frame rendering.
pub mod render;
/// Configuration, requests and the render pipeline.
pub mod session;

pub use crate::foundation::core::{
    Canvas, Fps, FrameIndex, FrameRange, LonLat, Point, Rect,
};
pub use crate::foundation::error::{RouteReelError, RouteReelResult};

pub use crate::basemap::tiles::{HttpTileSource, NoTiles, TileFetch, TileImage, TileKey, TileSource};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::geo::route::Route;
pub use crate::pace::samples::PaceSamples;
pub use crate::pace::timeline::{FrameTimeline, HudSample, RouteSummary};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::phase::{Phase, PhasePlan};
pub use crate::render::text::TextRasterizer;
pub use crate::session::config::{PipelineOpts, RenderThreading, TileSourceConfig, VideoConfig};
pub use crate::session::pipeline::{RenderStats, RouteVideo, VideoPlan};
pub use crate::session::request::{RouteVideoRequest, route_hash};
