//! Phase state machine: FOLLOW, HOLD, ZOOM_OUT, FINAL_HOLD in strict frame order.

use crate::foundation::core::{Fps, FrameIndex, FrameRange};
use crate::foundation::error::{RouteReelError, RouteReelResult};

/// Phase of one output frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Camera follows the dot; `index` is the follow-timeline entry.
    Follow { index: usize },
    /// Camera frozen on the finish with live stats.
    Hold,
    /// Viewport grows toward the fit-whole-route size; `progress` is in `(0, 1]`.
    ZoomOut { progress: f64 },
    /// Still frame at the fit-whole-route size.
    FinalHold,
}

/// Frame counts of the four phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PhasePlan {
    /// FOLLOW frames (`F`), one per timeline entry.
    pub follow: u64,
    /// HOLD frames (`H`).
    pub hold: u64,
    /// ZOOM_OUT frames (`Z`), always at least one.
    pub zoom: u64,
    /// FINAL_HOLD frames.
    pub final_hold: u64,
}

impl PhasePlan {
    /// Derive phase lengths from seconds at `fps`.
    pub fn new(
        follow: u64,
        fps: Fps,
        hold_secs: f64,
        zoom_secs: f64,
        final_hold_secs: f64,
    ) -> RouteReelResult<Self> {
        if follow == 0 {
            return Err(RouteReelError::validation(
                "follow phase must have at least one frame",
            ));
        }
        for (name, v) in [
            ("hold_at_finish_seconds", hold_secs),
            ("zoom_out_seconds", zoom_secs),
            ("final_summary_hold_seconds", final_hold_secs),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(RouteReelError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        Ok(Self {
            follow,
            hold: fps.secs_to_frames_round(hold_secs),
            zoom: fps.secs_to_frames_round(zoom_secs).max(1),
            final_hold: fps.secs_to_frames_round(final_hold_secs),
        })
    }

    /// Every frame the frame function can produce.
    pub fn total_frames(&self) -> u64 {
        self.follow + self.hold + self.zoom + self.final_hold
    }

    /// Frames handed to the encoder: FOLLOW, HOLD and ZOOM_OUT.
    ///
    /// FINAL_HOLD frames are renderable but not part of the encoded duration.
    pub fn encoded_frames(&self) -> u64 {
        self.follow + self.hold + self.zoom
    }

    /// `[0, encoded_frames)`.
    pub fn encoded_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.encoded_frames()),
        }
    }

    /// `[0, total_frames)`.
    pub fn full_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.total_frames()),
        }
    }

    /// Phase of `idx`, or `None` past the last frame.
    pub fn phase_at(&self, idx: FrameIndex) -> Option<Phase> {
        let i = idx.0;
        let hold_start = self.follow;
        let zoom_start = hold_start + self.hold;
        let final_start = zoom_start + self.zoom;
        if i < hold_start {
            let index = usize::try_from(i).ok()?;
            Some(Phase::Follow { index })
        } else if i < zoom_start {
            Some(Phase::Hold)
        } else if i < final_start {
            let k = i - zoom_start;
            Some(Phase::ZoomOut {
                progress: (k + 1) as f64 / self.zoom as f64,
            })
        } else if i < self.total_frames() {
            Some(Phase::FinalHold)
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/phase.rs"]
mod tests;
