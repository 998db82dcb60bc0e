//! Configuration, request parsing, and the prepare/render pipeline.

/// Video, tile and pipeline options.
pub mod config;
/// Prepared video and range rendering.
pub mod pipeline;
/// JSON request model.
pub mod request;
