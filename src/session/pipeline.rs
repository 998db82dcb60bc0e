//! Prepared video: everything expensive happens once in [`RouteVideo::prepare`], after which any
//! frame can be rendered independently and ranges can be streamed into a sink.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::basemap::compositor::Basemap;
use crate::basemap::tiles::{NoTiles, TileSource};
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
use crate::foundation::error::{RouteReelError, RouteReelResult};
use crate::geo::route::Route;
use crate::layout::camera::CropRect;
use crate::layout::zoom::{ZoomChoice, ZoomQuery};
use crate::pace::samples::PaceSamples;
use crate::pace::timeline::{FrameTimeline, RouteSummary};
use crate::render::backend::FrameRGBA;
use crate::render::frame::{FrameCamera, FrameRenderer};
use crate::render::phase::{Phase, PhasePlan};
use crate::render::text::TextRasterizer;
use crate::session::config::{PipelineOpts, RenderThreading, VideoConfig};
use crate::session::request::RouteVideoRequest;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Aggregated rendering counters.
pub struct RenderStats {
    /// Total requested frames.
    pub frames_total: u64,
    /// Frames that were actually rendered.
    pub frames_rendered: u64,
    /// Frames reused via static-frame elision.
    pub frames_elided: u64,
}

/// Serializable overview of a prepared video.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct VideoPlan {
    /// Zoom the follow camera and basemap use.
    pub zoom: u8,
    /// Zoom that was asked for.
    pub requested_zoom: u8,
    /// `true` when the zoom floor was hit and the basemap is clamped.
    pub zoom_degraded: bool,
    /// Basemap size.
    pub basemap: Canvas,
    /// `true` when tile imagery was used.
    pub tiled: bool,
    /// Output viewport.
    pub viewport: Canvas,
    /// Viewport size at the end of the zoom-out.
    pub fit_view: Canvas,
    /// Frame rate.
    pub fps: u32,
    /// Phase lengths.
    pub phases: PhasePlan,
    /// Frames the frame function can produce.
    pub total_frames: u64,
    /// Frames handed to the encoder.
    pub encoded_frames: u64,
    /// Duration of the encoded video.
    pub encoded_seconds: f64,
    /// Follow phase at real pace.
    pub naive_follow_seconds: f64,
    /// Follow phase after compression.
    pub paced_follow_seconds: f64,
    /// Compression factor applied to every segment.
    pub time_scale: f64,
    /// Frames contributed by each pace segment.
    pub segment_frames: Vec<u64>,
    /// Whole-route statistics.
    pub summary: RouteSummary,
}

/// A route video ready to render.
#[derive(Clone, Debug)]
pub struct RouteVideo {
    route: Route,
    config: VideoConfig,
    fps: Fps,
    timeline: FrameTimeline,
    zoom: ZoomChoice,
    renderer: FrameRenderer,
}

impl RouteVideo {
    /// Validate inputs, pace the follow phase, pick the zoom and build the basemap.
    ///
    /// `tiles` is only consulted when `config.map_tiles` is set.
    #[tracing::instrument(
        skip_all,
        fields(vertices = route.len(), samples = pace.len(), fps = config.fps)
    )]
    pub fn prepare(
        route: Route,
        pace: &PaceSamples,
        config: &VideoConfig,
        tiles: &dyn TileSource,
        text: TextRasterizer,
    ) -> RouteReelResult<Self> {
        config.validate()?;
        pace.validate()?;
        let fps = config.fps()?;
        let viewport = config.viewport();

        let timeline = FrameTimeline::build(&route, pace, fps, config.max_seconds)?;
        let query = ZoomQuery::new(
            timeline.positions(),
            route.points(),
            viewport,
            config.padding,
        );
        let zoom = query.select(config.follow_zoom);

        let source: &dyn TileSource = if config.map_tiles { tiles } else { &NoTiles };
        let basemap = Basemap::build(
            &zoom,
            timeline.positions(),
            route.points(),
            viewport,
            query.max_side,
            source,
            &text,
        )?;

        let phases = PhasePlan::new(
            timeline.len() as u64,
            fps,
            config.hold_at_finish_seconds,
            config.zoom_out_seconds,
            config.final_summary_hold_seconds,
        )?;
        let renderer = FrameRenderer::new(
            basemap,
            &timeline,
            &route,
            phases,
            viewport,
            config.padding,
            text,
        )?;

        tracing::info!(
            zoom = zoom.zoom,
            follow = phases.follow,
            hold = phases.hold,
            zoom_out = phases.zoom,
            final_hold = phases.final_hold,
            "prepared route video"
        );

        Ok(Self {
            route,
            config: config.clone(),
            fps,
            timeline,
            zoom,
            renderer,
        })
    }

    /// Prepare from a parsed request.
    pub fn from_request(
        req: &RouteVideoRequest,
        tiles: &dyn TileSource,
        text: TextRasterizer,
    ) -> RouteReelResult<Self> {
        req.config.validate()?;
        let route = req.route()?;
        let pace = req.pace()?;
        Self::prepare(route, &pace, &req.config, tiles, text)
    }

    /// Route geometry.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Options the video was prepared with.
    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    /// Output frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Follow-phase timeline.
    pub fn timeline(&self) -> &FrameTimeline {
        &self.timeline
    }

    /// Zoom search outcome.
    pub fn zoom(&self) -> ZoomChoice {
        self.zoom
    }

    /// Phase lengths.
    pub fn phases(&self) -> PhasePlan {
        self.renderer.phases()
    }

    /// Shared basemap.
    pub fn basemap(&self) -> &Basemap {
        self.renderer.basemap()
    }

    /// Phase, dot and crop for `idx`.
    pub fn camera_at(&self, idx: FrameIndex) -> RouteReelResult<FrameCamera> {
        self.renderer.camera_at(idx)
    }

    /// Render any frame in `[0, total_frames)`, FINAL_HOLD included.
    pub fn render_frame(&self, idx: FrameIndex) -> RouteReelResult<FrameRGBA> {
        self.renderer.render_frame(idx)
    }

    /// Overview of the prepared video.
    pub fn plan(&self) -> VideoPlan {
        let phases = self.phases();
        let pacing = self.timeline.pacing();
        VideoPlan {
            zoom: self.zoom.zoom,
            requested_zoom: self.config.follow_zoom,
            zoom_degraded: self.zoom.degraded,
            basemap: self.basemap().size(),
            tiled: self.basemap().is_tiled(),
            viewport: self.renderer.viewport(),
            fit_view: self.renderer.fit_size(),
            fps: self.fps.get(),
            phases,
            total_frames: phases.total_frames(),
            encoded_frames: phases.encoded_frames(),
            encoded_seconds: self.fps.frames_to_secs(phases.encoded_frames()),
            naive_follow_seconds: pacing.naive_total_secs,
            paced_follow_seconds: pacing.total_secs(),
            time_scale: pacing.scale,
            segment_frames: self.timeline.segment_frames().to_vec(),
            summary: self.timeline.summary(),
        }
    }

    /// Render `range` and push every frame into `sink` in increasing index order.
    ///
    /// On failure after `begin`, the sink is aborted instead of ended.
    #[tracing::instrument(skip(self, sink), fields(start = range.start.0, end = range.end.0))]
    pub fn render_range_to_sink(
        &self,
        range: FrameRange,
        threading: &RenderThreading,
        sink: &mut dyn FrameSink,
    ) -> RouteReelResult<RenderStats> {
        if range.is_empty() {
            return Err(RouteReelError::validation("render range must be non-empty"));
        }
        let total = self.phases().total_frames();
        if range.end.0 > total {
            return Err(RouteReelError::validation(format!(
                "render range end {} exceeds total frames {total}",
                range.end.0
            )));
        }

        let viewport = self.renderer.viewport();
        sink.begin(SinkConfig {
            width: viewport.width,
            height: viewport.height,
            fps: self.fps,
            frame_count: range.len_frames(),
        })?;

        match self.stream_range(range, threading, sink) {
            Ok(stats) => {
                sink.end()?;
                tracing::info!(
                    frames = stats.frames_total,
                    rendered = stats.frames_rendered,
                    elided = stats.frames_elided,
                    "render complete"
                );
                Ok(stats)
            }
            Err(e) => {
                sink.abort();
                Err(e)
            }
        }
    }

    /// Encode frames `[0, F+H+Z)` to an MP4 at `out_path`.
    pub fn render_to_mp4(&self, out_path: &Path, opts: &PipelineOpts) -> RouteReelResult<RenderStats> {
        let mut sink = FfmpegSink::new(FfmpegSinkOpts {
            out_path: out_path.to_path_buf(),
            overwrite: opts.overwrite,
            bg_rgba: [0, 0, 0, 255],
            finish_timeout: opts.encoder_timeout,
        });
        self.render_range_to_sink(self.phases().encoded_range(), &opts.threading, &mut sink)
    }

    /// Encode into `opts.out_dir`, named after `stem` unless `opts.file_name` is set.
    pub fn render_to_dir(
        &self,
        stem: &str,
        opts: &PipelineOpts,
    ) -> RouteReelResult<(PathBuf, RenderStats)> {
        let path = opts.output_path(stem);
        let stats = self.render_to_mp4(&path, opts)?;
        Ok((path, stats))
    }

    fn stream_range(
        &self,
        range: FrameRange,
        threading: &RenderThreading,
        sink: &mut dyn FrameSink,
    ) -> RouteReelResult<RenderStats> {
        let chunk_size = normalized_chunk_size(threading.chunk_size);
        let pool = if threading.parallel {
            Some(build_thread_pool(threading.threads)?)
        } else {
            None
        };

        let mut stats = RenderStats::default();
        let mut chunk_start = range.start.0;
        while chunk_start < range.end.0 {
            let chunk_end = (chunk_start + chunk_size).min(range.end.0);
            let chunk = self.render_chunk(
                chunk_start..chunk_end,
                threading.static_frame_elision,
                pool.as_ref(),
            )?;
            for (f, &u) in (chunk_start..chunk_end).zip(&chunk.frame_to_unique) {
                let frame = chunk.unique_frames.get(u).ok_or_else(|| {
                    RouteReelError::evaluation("internal error: unique frame missing")
                })?;
                sink.push_frame(FrameIndex(f), frame)?;
            }
            stats.frames_total += chunk.frame_to_unique.len() as u64;
            stats.frames_rendered += chunk.unique_frames.len() as u64;
            chunk_start = chunk_end;
        }
        stats.frames_elided = stats.frames_total - stats.frames_rendered;
        Ok(stats)
    }

    fn render_chunk(
        &self,
        frames: std::ops::Range<u64>,
        elide: bool,
        pool: Option<&rayon::ThreadPool>,
    ) -> RouteReelResult<ChunkOut> {
        let mut unique = Vec::<u64>::new();
        let mut frame_to_unique = Vec::<usize>::new();
        let mut first = HashMap::<ReuseKey, usize>::new();
        for f in frames {
            if elide {
                let key = ReuseKey::of(&self.renderer.camera_at(FrameIndex(f))?);
                if let Some(&slot) = first.get(&key) {
                    frame_to_unique.push(slot);
                    continue;
                }
                first.insert(key, unique.len());
            }
            frame_to_unique.push(unique.len());
            unique.push(f);
        }

        let rendered = match pool {
            Some(pool) => pool.install(|| {
                unique
                    .par_iter()
                    .map(|&f| self.renderer.render_frame(FrameIndex(f)))
                    .collect::<Vec<_>>()
            }),
            None => unique
                .iter()
                .map(|&f| self.renderer.render_frame(FrameIndex(f)))
                .collect(),
        };
        let unique_frames = rendered.into_iter().collect::<RouteReelResult<Vec<_>>>()?;
        Ok(ChunkOut {
            unique_frames,
            frame_to_unique,
        })
    }
}

struct ChunkOut {
    unique_frames: Vec<FrameRGBA>,
    frame_to_unique: Vec<usize>,
}

/// Two frames with the same key render to the same pixels.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct ReuseKey {
    summary: bool,
    dot_index: usize,
    crop: CropRect,
}

impl ReuseKey {
    fn of(cam: &FrameCamera) -> Self {
        Self {
            summary: matches!(cam.phase, Phase::ZoomOut { .. } | Phase::FinalHold),
            dot_index: cam.dot_index,
            crop: cam.crop,
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> RouteReelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(RouteReelError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| RouteReelError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    chunk_size.max(1) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/session/pipeline.rs"]
mod tests;
