use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{RouteReelError, RouteReelResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::backend::FrameRGBA;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
    /// How long to wait for `ffmpeg` to finish after the last frame.
    pub finish_timeout: Duration,
}

impl FfmpegSinkOpts {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
            finish_timeout: Duration::from_secs(300),
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw frames to stdin.
///
/// Any failure after `ffmpeg` was started removes the output file so a broken MP4 never looks
/// like a finished render.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }

    /// Output path this sink writes.
    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }

    fn kill_and_cleanup(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
        self.cfg = None;
        remove_partial_output(&self.opts.out_path);
    }

    fn fail(&mut self, msg: String) -> RouteReelError {
        self.kill_and_cleanup();
        RouteReelError::encode(msg)
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> RouteReelResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(RouteReelError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(RouteReelError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(RouteReelError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(RouteReelError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if self.opts.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }

        // Input: raw RGBA8 frames, flattened to opaque in push_frame.
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0"]);
        // Output: h264 + yuv420p for broad compatibility, no audio.
        cmd.args([
            "-an",
            "-c:v",
            "libx264",
            "-preset",
            "medium",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]);
        cmd.arg(&self.opts.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            RouteReelError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| RouteReelError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| RouteReelError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            out = %self.opts.out_path.display(),
            w = cfg.width,
            h = cfg.height,
            fps = cfg.fps.get(),
            frames = cfg.frame_count,
            "spawned ffmpeg"
        );

        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> RouteReelResult<()> {
        let (width, height) = match self.cfg.as_ref() {
            Some(cfg) => (cfg.width, cfg.height),
            None => return Err(RouteReelError::encode("ffmpeg sink not started")),
        };
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(self.fail("ffmpeg sink received out-of-order frame index".to_owned()));
        }
        self.last_idx = Some(idx);

        if frame.width != width || frame.height != height {
            return Err(self.fail(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, width, height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(self.fail("frame.data size mismatch with width*height*4".to_owned()));
        }

        flatten_premul_over_bg_to_opaque_rgba8(&mut self.scratch, &frame.data, self.opts.bg_rgba);

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(RouteReelError::encode("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        if let Err(e) = stdin.write_all(&self.scratch) {
            return Err(self.fail(format!("failed to write frame to ffmpeg stdin: {e}")));
        }
        Ok(())
    }

    fn end(&mut self) -> RouteReelResult<()> {
        drop(self.stdin.take());
        let Some(mut child) = self.child.take() else {
            return Err(RouteReelError::encode("ffmpeg sink not started"));
        };

        let status = match wait_with_timeout(&mut child, self.opts.finish_timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                self.child = Some(child);
                return Err(self.fail(format!(
                    "ffmpeg did not finish within {:?}; killed",
                    self.opts.finish_timeout
                )));
            }
            Err(e) => {
                self.child = Some(child);
                return Err(self.fail(format!("failed to wait for ffmpeg to finish: {e}")));
            }
        };

        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => match handle.join() {
                Ok(Ok(bytes)) => bytes,
                Ok(Err(e)) => {
                    return Err(self.fail(format!("ffmpeg stderr read failed: {e}")));
                }
                Err(_) => return Err(self.fail("ffmpeg stderr drain thread panicked".to_owned())),
            },
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(self.fail(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.cfg = None;
        Ok(())
    }

    fn abort(&mut self) {
        if self.child.is_some() {
            tracing::warn!(out = %self.opts.out_path.display(), "aborting ffmpeg encode");
            self.kill_and_cleanup();
        }
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // For rawvideo input, `-r` before `-i` sets the input framerate.
    cmd.args(["-r", &fps.get().to_string()]);
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

fn remove_partial_output(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove partial output"),
    }
}

fn flatten_premul_over_bg_to_opaque_rgba8(dst: &mut [u8], src_premul: &[u8], bg_rgba: [u8; 4]) {
    let bg_r = bg_rgba[0] as u16;
    let bg_g = bg_rgba[1] as u16;
    let bg_b = bg_rgba[2] as u16;

    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = s[3] as u16;
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        d[0] = (s[0] as u16 + mul_div255_u16(bg_r, inv)).min(255) as u8;
        d[1] = (s[1] as u16 + mul_div255_u16(bg_g, inv)).min(255) as u8;
        d[2] = (s[2] as u16 + mul_div255_u16(bg_b, inv)).min(255) as u8;
        d[3] = 255;
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> RouteReelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
