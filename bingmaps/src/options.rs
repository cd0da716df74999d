use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::io::HttpOptions;
use crate::metadata::METADATA_URL;

/// Settings of the generic tile source owning the tiles. They are not interpreted here, just kept
/// for the tile source to pick up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileSourceOptions {
    /// Number of tiles to keep in the cache.
    pub cache_size: Option<usize>,

    /// Cross-origin policy of the image requests, e.g. `anonymous`.
    pub cross_origin: Option<String>,

    /// Whether the world wraps around the antimeridian.
    pub wrap_x: bool,

    /// Duration of the fade-in of freshly loaded tiles.
    pub transition: Option<Duration>,
}

impl Default for TileSourceOptions {
    fn default() -> Self {
        Self {
            cache_size: None,
            cross_origin: None,
            wrap_x: true,
            transition: None,
        }
    }
}

/// Configuration of [`crate::BingMaps`].
#[derive(Debug, Clone)]
pub struct Options {
    /// Bing Maps key, required.
    /// <https://www.bingmapsportal.com/>
    pub api_key: String,

    /// Imagery set, such as `Aerial`, `AerialWithLabelsOnDemand` or `RoadOnDemand`.
    pub imagery_set: String,

    /// Language of the labels.
    pub culture: String,

    /// Request double resolution tiles for high-density displays.
    pub hidpi: bool,

    /// Limit the zoom levels to this one, instead of the one supported by the provider.
    /// See [`crate::max_zoom_override`] for the legacy, integer form.
    pub max_zoom: Option<u8>,

    /// Whether to request "no imagery" placeholders for areas without imagery. `None` keeps the
    /// provider's default.
    pub placeholder_tiles: Option<bool>,

    /// Base of the REST services, [`METADATA_URL`] by default.
    pub metadata_url: String,

    pub http: HttpOptions,

    pub tile_source: TileSourceOptions,
}

impl Options {
    pub fn new(api_key: impl Into<String>, imagery_set: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            imagery_set: imagery_set.into(),
            culture: "en-us".to_owned(),
            hidpi: false,
            max_zoom: None,
            placeholder_tiles: None,
            metadata_url: METADATA_URL.to_owned(),
            http: HttpOptions::default(),
            tile_source: TileSourceOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = Options::new("key", "Aerial");
        assert_eq!("en-us", options.culture);
        assert!(!options.hidpi);
        assert_eq!(None, options.max_zoom);
        assert_eq!(None, options.http.timeout);
        assert_eq!(METADATA_URL, options.metadata_url);
        assert!(options.tile_source.wrap_x);
    }

    #[test]
    fn tile_source_options_from_json() {
        let options: TileSourceOptions =
            serde_json::from_str(r#"{"cache_size": 512, "cross_origin": "anonymous"}"#).unwrap();

        assert_eq!(
            TileSourceOptions {
                cache_size: Some(512),
                cross_origin: Some("anonymous".to_owned()),
                wrap_x: true,
                transition: None,
            },
            options
        );
    }
}
