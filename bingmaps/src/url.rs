//! Turning tile coordinates into tile URLs.

use crate::projection::Projection;
use crate::quadkey::TileCoord;

/// Query parameters requesting double resolution tiles.
const HIDPI_PARAMETERS: &str = "&dpi=d1&device=mobile";

/// Everything needed to build a [`TileUrlFunction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlConfig {
    /// Template with `{subdomain}`, `{culture}` and `{quadkey}` placeholders.
    pub template: String,
    pub subdomains: Vec<String>,
    pub culture: String,
    pub hidpi: bool,

    /// `Some(false)` asks the server for empty responses instead of "no imagery" placeholders,
    /// `Some(true)` asks for placeholders, `None` keeps whatever the template does.
    pub placeholder_tiles: Option<bool>,
}

/// Builds URLs of the tiles, spreading them over the available subdomains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileUrlFunction {
    /// One per subdomain, only `{quadkey}` is left to be substituted.
    templates: Vec<String>,
}

impl TileUrlFunction {
    pub fn new(config: UrlConfig) -> Self {
        let UrlConfig {
            template,
            subdomains,
            culture,
            hidpi,
            placeholder_tiles,
        } = config;

        let template = match placeholder_tiles {
            Some(true) => with_query_parameter(&template, "n", None),
            Some(false) => with_query_parameter(&template, "n", Some("z")),
            None => template,
        };

        let template = template.replace("{culture}", &culture);
        let template = if hidpi {
            template + HIDPI_PARAMETERS
        } else {
            template
        };

        let templates = if subdomains.is_empty() {
            log::warn!("No subdomains in '{template}'.");
            vec![template]
        } else {
            subdomains
                .iter()
                .map(|subdomain| template.replace("{subdomain}", subdomain))
                .collect()
        };

        Self { templates }
    }

    /// URL of the given tile, or `None` if there is no tile to fetch.
    ///
    /// The same tile always lands on the same subdomain, so the connections (and the browser
    /// cache) can be reused.
    pub fn url(
        &self,
        tile: Option<TileCoord>,
        _pixel_ratio: f32,
        _projection: &dyn Projection,
    ) -> Option<String> {
        let tile = tile?;
        Some(self.template_for(tile).replace("{quadkey}", &tile.quadkey()))
    }

    /// Base URLs, one per subdomain.
    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    fn template_for(&self, tile: TileCoord) -> &str {
        let hash = tile
            .x
            .wrapping_shl(tile.zoom.into())
            .wrapping_add(tile.y);

        let count = i64::try_from(self.templates.len()).unwrap_or(i64::MAX);
        let index = usize::try_from(hash.rem_euclid(count)).unwrap_or_default();
        &self.templates[index]
    }
}

/// Set (or remove, if `value` is `None`) the query parameter.
fn with_query_parameter(url: &str, key: &str, value: Option<&str>) -> String {
    let (base, query) = url.split_once('?').unwrap_or((url, ""));

    let mut parameters: Vec<String> = query
        .split('&')
        .filter(|parameter| !parameter.is_empty())
        .filter(|parameter| parameter.split('=').next() != Some(key))
        .map(ToOwned::to_owned)
        .collect();

    if let Some(value) = value {
        parameters.push(format!("{key}={value}"));
    }

    if parameters.is_empty() {
        base.to_owned()
    } else {
        format!("{base}?{}", parameters.join("&"))
    }
}
