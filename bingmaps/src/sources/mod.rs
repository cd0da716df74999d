//! Tile sources, as seen by the tile-rendering pipeline. Make sure you follow terms of usage of
//! the particular source.

mod bing_maps;

pub use bing_maps::BingMaps;

use crate::attribution::FrameState;
use crate::grid::TileGrid;
use crate::projection::Projection;
use crate::quadkey::TileCoord;

/// Lifecycle of a tile source. It starts with [`SourceState::Loading`] and moves, exactly once,
/// to either [`SourceState::Ready`] or [`SourceState::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceState {
    Loading,
    Ready,

    /// Source will never produce any tiles.
    Error,
}

/// What the tile-rendering pipeline needs from a tile source. The pipeline owns the tile cache
/// and does the fetching, the source only tells it where to get the tiles from.
pub trait TileSource {
    fn state(&self) -> SourceState;

    /// Available once the source is ready.
    fn tile_grid(&self) -> Option<&TileGrid>;

    /// URL of the tile, `None` if there is nothing to fetch, e.g. the source is not ready or the
    /// tile was wrapped away.
    fn tile_url(
        &self,
        tile: Option<TileCoord>,
        pixel_ratio: f32,
        projection: &dyn Projection,
    ) -> Option<String>;

    /// Attributions to be displayed along with the map. Typically, this should be displayed
    /// somewhere on the bottom of the map.
    fn attributions(&self, frame: &FrameState) -> Vec<&str>;
}
