//! Project the lon/lat coordinates into the map's working plane.
//! <https://en.wikipedia.org/wiki/Web_Mercator_projection>

use std::f64::consts::PI;

use geo_types::{Coord, coord};

/// Geographical position with longitude and latitude.
pub type Position = geo_types::Point;

/// Axis-aligned box in the projected plane, or in degrees for [`Geographic`].
pub type Extent = geo_types::Rect<f64>;

/// Construct `Position` from longitude and latitude.
pub fn lon_lat(lon: f64, lat: f64) -> Position {
    Position::new(lon, lat)
}

/// Construct `Extent` from its `[min_x, min_y, max_x, max_y]` corners.
pub fn extent(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Extent {
    Extent::new(coord! { x: min_x, y: min_y }, coord! { x: max_x, y: max_y })
}

/// Whether two extents overlap. Touching edges count as an overlap.
pub fn intersects(a: &Extent, b: &Extent) -> bool {
    a.min().x <= b.max().x
        && a.max().x >= b.min().x
        && a.min().y <= b.max().y
        && a.max().y >= b.min().y
}

/// Transformation of geographical coordinates into a map projection.
pub trait Projection {
    /// Identifier, such as `EPSG:3857`.
    fn code(&self) -> &str;

    /// Valid extent of the projection.
    fn extent(&self) -> Extent;

    /// Project the position into the plane.
    fn project(&self, position: Position) -> Coord;

    /// Project a geographical bounding box. Corners are projected independently, which is exact
    /// for cylindrical projections.
    fn transform_extent(&self, south_west: Position, north_east: Position) -> Extent {
        Extent::new(self.project(south_west), self.project(north_east))
    }
}

/// Radius of the sphere used by the Web Mercator.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Half of the side of the square world in Web Mercator meters.
pub const HALF_SIZE: f64 = PI * EARTH_RADIUS;

/// Spherical Mercator, used by Bing Maps and most of the tile servers.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl Projection for WebMercator {
    fn code(&self) -> &str {
        "EPSG:3857"
    }

    fn extent(&self) -> Extent {
        extent(-HALF_SIZE, -HALF_SIZE, HALF_SIZE, HALF_SIZE)
    }

    fn project(&self, position: Position) -> Coord {
        let x = EARTH_RADIUS * position.x().to_radians();
        let y = EARTH_RADIUS * position.y().to_radians().tan().asinh();

        // Poles are infinitely far away.
        coord! { x: x, y: y.clamp(-HALF_SIZE, HALF_SIZE) }
    }
}

/// Plain longitude and latitude in degrees.
#[derive(Debug, Clone, Copy, Default)]
pub struct Geographic;

impl Projection for Geographic {
    fn code(&self) -> &str {
        "EPSG:4326"
    }

    fn extent(&self) -> Extent {
        extent(-180., -90., 180., 90.)
    }

    fn project(&self, position: Position) -> Coord {
        position.0
    }
}
