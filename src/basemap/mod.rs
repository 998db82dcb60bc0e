//! Stitched basemap and the tile sources feeding it.

/// Basemap compositor.
pub mod compositor;
/// Tile-source capability.
pub mod tiles;
