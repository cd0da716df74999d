#![doc = include_str!("../README.md")]
#![deny(clippy::unwrap_used, rustdoc::broken_intra_doc_links)]

mod attribution;
mod grid;
mod io;
mod metadata;
mod options;
mod projection;
mod quadkey;
pub mod sources;
mod url;

pub use attribution::{AttributionResolver, FrameState, TOS_ATTRIBUTION};
pub use grid::{TileGrid, TileSize, USE_PROVIDER_MAX_ZOOM, max_zoom_override};
pub use io::{Fetch, HeaderValue, HttpFetch, HttpOptions};
pub use metadata::{
    CoverageArea, ImageryProvider, METADATA_URL, Metadata, MetadataError, Resource, ResourceSet,
    metadata_url, parse,
};
pub use options::{Options, TileSourceOptions};
pub use projection::{
    EARTH_RADIUS, Extent, Geographic, HALF_SIZE, Position, Projection, WebMercator, extent,
    intersects, lon_lat,
};
pub use quadkey::{TileCoord, quadkey};
pub use sources::{BingMaps, SourceState, TileSource};
pub use url::{TileUrlFunction, UrlConfig};
