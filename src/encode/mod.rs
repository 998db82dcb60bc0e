//! Encoding sinks.
//!
//! Sinks consume rendered frames in order and are driven by `RouteVideo::render_range_to_sink`.

/// `ffmpeg`-based MP4 sink.
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
