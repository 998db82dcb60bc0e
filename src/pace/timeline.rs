//! Pacing engine: route geometry + pace samples -> one camera position per follow-phase frame.
//!
//! Each consecutive pair of pace samples forms a segment whose real-world duration is
//! `distance / speed`. Durations are linearly compressed when their sum exceeds the configured
//! maximum, then quantized into whole frames. The HUD timeline is interpolated with the same
//! per-frame progress as the camera, so position and printed stats never drift apart.

use crate::foundation::core::{Fps, LonLat};
use crate::foundation::error::{RouteReelError, RouteReelResult};
use crate::foundation::math::lerp;
use crate::geo::route::Route;
use crate::pace::samples::PaceSamples;

/// Speeds below this are treated as this value when computing durations.
pub const MIN_SPEED_MPH: f64 = 0.1;
/// Lower bound on a single segment's simulated duration.
pub const MIN_SEGMENT_SECS: f64 = 0.01;
/// Upper bound on frames generated for one segment.
pub const MAX_FRAMES_PER_SEGMENT: u64 = 1_000_000;
/// Upper bound on `max_seconds * fps`, ten hours of follow footage at 30 fps.
pub const MAX_FOLLOW_FRAMES: u64 = 1_080_000;

/// Live statistics for one follow-phase frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct HudSample {
    /// Distance covered so far, in miles.
    pub distance_mi: f64,
    /// Instantaneous speed in mph.
    pub speed_mph: f64,
    /// Elevation in feet when the pace profile carries it.
    pub elevation_ft: Option<f64>,
}

/// Whole-route statistics shown once the camera starts zooming out.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct RouteSummary {
    /// Distance at the final frame, in miles.
    pub total_distance_mi: f64,
    /// Mean of the per-frame speeds.
    pub average_speed_mph: f64,
    /// Mean of the finite per-frame elevations, if any.
    pub average_elevation_ft: Option<f64>,
}

/// Per-segment simulated durations after the optional time compression.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentPacing {
    /// Duration of each segment in seconds.
    pub durations_secs: Vec<f64>,
    /// Sum of durations before compression.
    pub naive_total_secs: f64,
    /// Factor applied to every duration (`1.0` when no compression happened).
    pub scale: f64,
}

impl SegmentPacing {
    /// Compute segment durations from a validated pace profile and cap them at `max_seconds`.
    pub fn compute(pace: &PaceSamples, max_seconds: f64) -> RouteReelResult<Self> {
        if !(max_seconds.is_finite() && max_seconds > 0.0) {
            return Err(RouteReelError::validation(
                "max_seconds must be finite and > 0",
            ));
        }
        let mut durations_secs = naive_segment_durations(pace);
        let naive_total_secs: f64 = durations_secs.iter().sum();
        let scale = cap_durations(&mut durations_secs, max_seconds);
        Ok(Self {
            durations_secs,
            naive_total_secs,
            scale,
        })
    }

    /// Sum of the (possibly compressed) durations.
    pub fn total_secs(&self) -> f64 {
        self.durations_secs.iter().sum()
    }

    /// Quantize each duration into a whole number of frames, each segment getting at least one.
    pub fn frames_per_segment(&self, fps: Fps) -> Vec<u64> {
        self.durations_secs
            .iter()
            .map(|&s| {
                let n = (s * fps.as_f64()).round();
                if n.is_finite() {
                    (n.max(1.0) as u64).min(MAX_FRAMES_PER_SEGMENT)
                } else {
                    1
                }
            })
            .collect()
    }
}

/// Real-world duration of each consecutive sample pair, using the speed at the segment's end.
pub fn naive_segment_durations(pace: &PaceSamples) -> Vec<f64> {
    pace.distance_mi
        .windows(2)
        .zip(pace.speed_mph.iter().skip(1))
        .map(|(d, &v)| {
            let dd = (d[1] - d[0]).max(0.0);
            (dd / v.max(MIN_SPEED_MPH) * 3600.0).max(MIN_SEGMENT_SECS)
        })
        .collect()
}

/// Uniformly scale `durations` so they sum to `max_seconds` when they exceed it.
///
/// Returns the applied factor. Relative pacing between segments is preserved.
pub fn cap_durations(durations: &mut [f64], max_seconds: f64) -> f64 {
    let total: f64 = durations.iter().sum();
    if total <= max_seconds || total <= 0.0 {
        return 1.0;
    }
    let scale = max_seconds / total;
    for d in durations.iter_mut() {
        *d *= scale;
    }
    scale
}

/// Follow-phase camera positions plus the co-indexed HUD timeline.
#[derive(Clone, Debug)]
pub struct FrameTimeline {
    positions: Vec<LonLat>,
    hud: Vec<HudSample>,
    segment_frames: Vec<u64>,
    pacing: SegmentPacing,
}

impl FrameTimeline {
    /// Build the timeline for `route` paced by `pace` at `fps`, capped at `max_seconds`.
    #[tracing::instrument(skip(route, pace), fields(vertices = route.len(), samples = pace.len()))]
    pub fn build(
        route: &Route,
        pace: &PaceSamples,
        fps: Fps,
        max_seconds: f64,
    ) -> RouteReelResult<Self> {
        pace.validate()?;
        let route_mi = route.cumulative_miles().last().copied().unwrap_or(0.0);
        let pace = &pace.clipped_to(route_mi.max(1e-6));
        let sample_pts = route.positions_at_distances(&pace.distance_mi);
        let pacing = SegmentPacing::compute(pace, max_seconds)?;
        let segment_frames = pacing.frames_per_segment(fps);

        let total: u64 = segment_frames.iter().sum();
        // Rounding adds at most one frame per segment on top of `max_seconds * fps`.
        if total > MAX_FOLLOW_FRAMES + segment_frames.len() as u64 {
            return Err(RouteReelError::validation(format!(
                "follow timeline would need {total} frames, limit is {MAX_FOLLOW_FRAMES}; \
                 lower max_seconds or fps"
            )));
        }
        let cap = usize::try_from(total)
            .map_err(|_| RouteReelError::validation("follow timeline too long for this platform"))?;
        let mut positions = Vec::with_capacity(cap);
        let mut hud = Vec::with_capacity(cap);

        for (i, &n) in segment_frames.iter().enumerate() {
            let (p0, p1) = (sample_pts[i], sample_pts[i + 1]);
            for k in 0..n {
                // Frames land on (k + 1) / n so the last frame of the last segment is the finish.
                let t = (k + 1) as f64 / n as f64;
                positions.push(p0.lerp(p1, t));
                hud.push(hud_sample(pace, i, t));
            }
        }

        tracing::debug!(
            frames = positions.len(),
            naive_secs = pacing.naive_total_secs,
            paced_secs = pacing.total_secs(),
            scale = pacing.scale,
            "built follow timeline"
        );

        Ok(Self {
            positions,
            hud,
            segment_frames,
            pacing,
        })
    }

    /// Number of follow-phase frames (`F`).
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always `false` for a built timeline; every segment contributes at least one frame.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Camera/dot position for each follow-phase frame.
    pub fn positions(&self) -> &[LonLat] {
        &self.positions
    }

    /// HUD statistics co-indexed with [`positions`](Self::positions).
    pub fn hud(&self) -> &[HudSample] {
        &self.hud
    }

    /// Frames contributed by each pace segment; sums to [`len`](Self::len).
    pub fn segment_frames(&self) -> &[u64] {
        &self.segment_frames
    }

    /// Segment durations used to derive the frame counts.
    pub fn pacing(&self) -> &SegmentPacing {
        &self.pacing
    }

    /// Position of the final follow frame (the finish dot).
    pub fn finish(&self) -> LonLat {
        self.positions[self.positions.len() - 1]
    }

    /// HUD values at the finish.
    pub fn finish_hud(&self) -> HudSample {
        self.hud[self.hud.len() - 1]
    }

    /// Summary statistics over the whole follow phase.
    pub fn summary(&self) -> RouteSummary {
        let n = self.hud.len().max(1) as f64;
        let average_speed_mph = self.hud.iter().map(|h| h.speed_mph).sum::<f64>() / n;

        let (sum, count) = self
            .hud
            .iter()
            .filter_map(|h| h.elevation_ft)
            .filter(|e| e.is_finite())
            .fold((0.0, 0usize), |(s, c), e| (s + e, c + 1));
        let average_elevation_ft = (count > 0).then(|| sum / count as f64);

        RouteSummary {
            total_distance_mi: self.finish_hud().distance_mi,
            average_speed_mph,
            average_elevation_ft,
        }
    }
}

fn hud_sample(pace: &PaceSamples, seg: usize, t: f64) -> HudSample {
    let at = |v: &[f64]| lerp(v[seg], v[seg + 1], t);
    HudSample {
        distance_mi: at(&pace.distance_mi),
        speed_mph: at(&pace.speed_mph),
        elevation_ft: pace.elevation_ft.as_deref().map(at),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pace/timeline.rs"]
mod tests;
