use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use super::{SourceState, TileSource};
use crate::attribution::{AttributionResolver, FrameState, TOS_ATTRIBUTION};
use crate::grid::TileGrid;
use crate::io::runtime::{self, Runtime};
use crate::io::{Fetch, HttpFetch};
use crate::metadata::{self, MetadataError, Resource, metadata_url};
use crate::options::{Options, TileSourceOptions};
use crate::projection::{Projection, WebMercator};
use crate::quadkey::TileCoord;
use crate::url::{TileUrlFunction, UrlConfig};

/// Everything built out of the metadata. Never changes once installed.
#[derive(Debug)]
struct Installed {
    tile_grid: TileGrid,
    tile_url: TileUrlFunction,
    attributions: Option<AttributionResolver>,
}

/// State shared with the IO thread.
#[derive(Default)]
struct Shared {
    /// Unset while loading. Can be set only once, which makes the transition final.
    outcome: OnceLock<Result<Installed, MetadataError>>,

    disposed: AtomicBool,
}

/// Parts of the [`Options`] needed to interpret the metadata.
struct LoadConfig {
    culture: String,
    hidpi: bool,
    max_zoom: Option<u8>,
    placeholder_tiles: Option<bool>,
    timeout: Option<Duration>,
}

/// Bing Maps imagery.
/// <https://learn.microsoft.com/en-us/bingmaps/rest-services/imagery/>
///
/// Construction starts fetching the imagery metadata in the background. Until it arrives, the
/// source is [`SourceState::Loading`]. It must persist between frames.
pub struct BingMaps {
    api_key: String,
    imagery_set: String,
    culture: String,
    hidpi: bool,
    tile_source: TileSourceOptions,
    shared: Arc<Shared>,

    #[allow(dead_code)] // Significant Drop
    runtime: Runtime,
}

impl BingMaps {
    /// Construct new [`BingMaps`], fetching the metadata over HTTP.
    pub fn new(options: Options) -> Self {
        let fetch = HttpFetch::new(&options.http);
        Self::with_fetch(options, fetch)
    }

    /// Construct new [`BingMaps`], getting the metadata from the supplied [`Fetch`].
    pub fn with_fetch(options: Options, fetch: impl Fetch + Send + Sync + 'static) -> Self {
        let Options {
            api_key,
            imagery_set,
            culture,
            hidpi,
            max_zoom,
            placeholder_tiles,
            metadata_url: base_url,
            http,
            tile_source,
        } = options;

        let url = metadata_url(&base_url, &imagery_set, &api_key, &culture);
        log::debug!(
            "Fetching metadata from {}.",
            metadata_url(&base_url, &imagery_set, "<redacted>", &culture)
        );

        let config = LoadConfig {
            culture: culture.clone(),
            hidpi,
            max_zoom,
            placeholder_tiles,
            timeout: http.timeout,
        };

        let shared = Arc::new(Shared::default());
        let runtime = Runtime::new(load(fetch, url, config, Arc::clone(&shared)));

        Self {
            api_key,
            imagery_set,
            culture,
            hidpi,
            tile_source,
            shared,
            runtime,
        }
    }

    /// Why the source ended up in [`SourceState::Error`].
    pub fn error(&self) -> Option<&MetadataError> {
        self.shared.outcome.get()?.as_ref().err()
    }

    /// Available once the source is ready.
    pub fn tile_url_function(&self) -> Option<&TileUrlFunction> {
        Some(&self.installed()?.tile_url)
    }

    /// Available once the source is ready, and only if the metadata listed imagery providers.
    pub fn attribution_resolver(&self) -> Option<&AttributionResolver> {
        self.installed()?.attributions.as_ref()
    }

    /// Ignore the metadata if it arrives from now on. The source stays in its current state.
    pub fn dispose(&self) {
        self.shared.disposed.store(true, Ordering::Release);
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn imagery_set(&self) -> &str {
        &self.imagery_set
    }

    pub fn culture(&self) -> &str {
        &self.culture
    }

    pub fn hidpi(&self) -> bool {
        self.hidpi
    }

    /// Settings for the tile source owning the tiles, exactly as given in [`Options`].
    pub fn tile_source_options(&self) -> &TileSourceOptions {
        &self.tile_source
    }

    fn installed(&self) -> Option<&Installed> {
        self.shared.outcome.get()?.as_ref().ok()
    }
}

impl TileSource for BingMaps {
    fn state(&self) -> SourceState {
        match self.shared.outcome.get() {
            None => SourceState::Loading,
            Some(Ok(_)) => SourceState::Ready,
            Some(Err(_)) => SourceState::Error,
        }
    }

    fn tile_grid(&self) -> Option<&TileGrid> {
        Some(&self.installed()?.tile_grid)
    }

    fn tile_url(
        &self,
        tile: Option<TileCoord>,
        pixel_ratio: f32,
        projection: &dyn Projection,
    ) -> Option<String> {
        self.tile_url_function()?.url(tile, pixel_ratio, projection)
    }

    fn attributions(&self, frame: &FrameState) -> Vec<&str> {
        self.attribution_resolver()
            .map(|resolver| resolver.attributions(frame))
            .unwrap_or_default()
    }
}

/// Fetch the metadata and install whatever it describes. Runs once, on the IO thread.
async fn load(fetch: impl Fetch, url: String, config: LoadConfig, shared: Arc<Shared>) {
    let outcome = fetch_resource(&fetch, &url, config.timeout)
        .await
        .map(|resource| install(resource, &config));

    if shared.disposed.load(Ordering::Acquire) {
        log::debug!("Source was disposed, ignoring the metadata.");
        return;
    }

    match &outcome {
        Ok(_) => log::debug!("Bing Maps source is ready."),
        Err(error) => log::warn!("Bing Maps source failed: {error}"),
    }

    if shared.outcome.set(outcome).is_err() {
        log::error!("Metadata was delivered more than once.");
    }
}

async fn fetch_resource(
    fetch: &impl Fetch,
    url: &str,
    timeout: Option<Duration>,
) -> Result<Resource, MetadataError> {
    let bytes = match timeout {
        Some(duration) => runtime::timeout(duration, fetch.fetch(url))
            .await
            .ok_or(MetadataError::Timeout)?,
        None => fetch.fetch(url).await,
    }
    .map_err(|error| MetadataError::Fetch(error.to_string()))?;

    metadata::parse(&bytes)
}

fn install(resource: Resource, config: &LoadConfig) -> Installed {
    let projection = WebMercator;

    let tile_grid = TileGrid::from_resource(
        &resource,
        config.max_zoom,
        config.hidpi,
        projection.extent(),
    );

    let attributions = (!resource.imagery_providers.is_empty()).then(|| {
        AttributionResolver::new(&resource.imagery_providers, &projection, TOS_ATTRIBUTION)
    });

    let tile_url = TileUrlFunction::new(UrlConfig {
        template: resource.image_url,
        subdomains: resource.image_url_subdomains,
        culture: config.culture.clone(),
        hidpi: config.hidpi,
        placeholder_tiles: config.placeholder_tiles,
    });

    Installed {
        tile_grid,
        tile_url,
        attributions,
    }
}
