/// Rendered frame type.
pub mod backend;
/// Frame function over the prepared basemap and timelines.
pub mod frame;
/// HUD panel content and sizing.
pub mod hud;
/// Follow / hold / zoom-out / final-hold state machine.
pub mod phase;
pub(crate) mod raster;
/// Text and panel rasterization.
pub mod text;
