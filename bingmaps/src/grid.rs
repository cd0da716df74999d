//! Pyramid of tiles covering the extent of the projection.

use geo_types::{Coord, coord};

use crate::metadata::Resource;
use crate::projection::{Extent, extent};
use crate::quadkey::TileCoord;

/// Legacy value of the `max_zoom` setting, meaning "whatever the provider supports".
pub const USE_PROVIDER_MAX_ZOOM: i32 = -1;

/// Convert the legacy, integer `max_zoom` setting into an override.
pub fn max_zoom_override(value: i32) -> Option<u8> {
    if value == USE_PROVIDER_MAX_ZOOM {
        None
    } else {
        u8::try_from(value.clamp(0, u8::MAX.into())).ok()
    }
}

/// Size of a tile in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileSize {
    Square(u32),
    Rectangular { width: u32, height: u32 },
}

impl TileSize {
    pub fn new(width: u32, height: u32) -> Self {
        if width == height {
            Self::Square(width)
        } else {
            Self::Rectangular { width, height }
        }
    }

    pub fn width(&self) -> u32 {
        match self {
            Self::Square(size) => *size,
            Self::Rectangular { width, .. } => *width,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Square(size) => *size,
            Self::Rectangular { height, .. } => *height,
        }
    }

    fn halved(self) -> Self {
        match self {
            Self::Square(size) => Self::Square(size / 2),
            Self::Rectangular { width, height } => Self::Rectangular {
                width: width / 2,
                height: height / 2,
            },
        }
    }
}

/// Power-of-two pyramid of tiles: every zoom level has twice the tiles along each axis of the
/// previous one. Origin is the top-left corner of the extent.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    extent: Extent,
    min_zoom: u8,
    max_zoom: u8,
    tile_size: TileSize,
    resolutions: Vec<f64>,
}

impl TileGrid {
    pub fn new(extent: Extent, min_zoom: u8, max_zoom: u8, tile_size: TileSize) -> Self {
        let max_resolution = (extent.width() / f64::from(tile_size.width()))
            .max(extent.height() / f64::from(tile_size.height()));

        let resolutions = (0..=max_zoom)
            .map(|zoom| max_resolution / 2f64.powi(zoom.into()))
            .collect();

        Self {
            extent,
            min_zoom,
            max_zoom,
            tile_size,
            resolutions,
        }
    }

    /// Grid described by the imagery metadata.
    ///
    /// Tiles served in high-density mode have twice the pixels, but cover the same area, hence
    /// the tile size is halved.
    pub fn from_resource(
        resource: &Resource,
        max_zoom: Option<u8>,
        hidpi: bool,
        extent: Extent,
    ) -> Self {
        let tile_size = TileSize::new(resource.image_width, resource.image_height);
        let tile_size = if hidpi { tile_size.halved() } else { tile_size };

        Self::new(
            extent,
            resource.zoom_min,
            max_zoom.unwrap_or(resource.zoom_max),
            tile_size,
        )
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Top-left corner of the grid.
    pub fn origin(&self) -> Coord {
        coord! { x: self.extent.min().x, y: self.extent.max().y }
    }

    pub fn min_zoom(&self) -> u8 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    pub fn tile_size(&self) -> TileSize {
        self.tile_size
    }

    /// Map units per pixel for each zoom level, starting from zoom 0.
    pub fn resolutions(&self) -> &[f64] {
        &self.resolutions
    }

    pub fn resolution(&self, zoom: u8) -> Option<f64> {
        self.resolutions.get(usize::from(zoom)).copied()
    }

    /// Zoom level with the resolution closest to the given one, within the supported zoom range.
    pub fn z_for_resolution(&self, resolution: f64) -> u8 {
        (self.min_zoom..=self.max_zoom)
            .zip(self.resolutions.iter().skip(self.min_zoom.into()))
            .min_by(|(_, a), (_, b)| (*a - resolution).abs().total_cmp(&(*b - resolution).abs()))
            .map_or(self.min_zoom, |(zoom, _)| zoom)
    }

    /// Area covered by the tile. Rows are negative, `-1` being the topmost one.
    pub fn tile_coord_extent(&self, tile: TileCoord) -> Option<Extent> {
        let resolution = self.resolution(tile.zoom)?;
        let width = f64::from(self.tile_size.width()) * resolution;
        let height = f64::from(self.tile_size.height()) * resolution;
        let origin = self.origin();

        let (x, y) = (tile.x as f64, tile.y as f64);

        let min_x = origin.x + x * width;
        let min_y = origin.y + y * height;
        Some(extent(min_x, min_y, min_x + width, min_y + height))
    }
}
