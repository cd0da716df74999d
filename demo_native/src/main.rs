use std::process::ExitCode;
use std::time::{Duration, Instant};

use bingmaps::{
    BingMaps, FrameState, Options, SourceState, TileCoord, TileSource, WebMercator,
    max_zoom_override,
};
use clap::Parser;

/// Fetch the metadata of a Bing Maps imagery set, then print the URL and the attributions of a
/// single tile.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Bing Maps key.
    #[arg(long, env = "BING_MAPS_KEY", hide_env_values = true)]
    api_key: String,

    #[arg(long, env = "BING_MAPS_IMAGERY_SET", default_value = "Aerial")]
    imagery_set: String,

    /// Language of the labels.
    #[arg(long, default_value = "en-us")]
    culture: String,

    /// Request double resolution tiles.
    #[arg(long)]
    hidpi: bool,

    /// Highest zoom level to use, `-1` uses the one supported by the imagery set.
    #[arg(long, default_value_t = bingmaps::USE_PROVIDER_MAX_ZOOM, allow_negative_numbers = true)]
    max_zoom: i32,

    /// Give up on the metadata after this many seconds.
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Zoom level of the tile.
    #[arg(default_value_t = 3)]
    zoom: u8,

    /// Column of the tile.
    #[arg(default_value_t = 3)]
    x: i64,

    /// Row of the tile, `-1` being the topmost one.
    #[arg(default_value_t = -6, allow_negative_numbers = true)]
    y: i64,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let mut options = Options::new(cli.api_key, cli.imagery_set);
    options.culture = cli.culture;
    options.hidpi = cli.hidpi;
    options.max_zoom = max_zoom_override(cli.max_zoom);
    options.http.timeout = Some(Duration::from_secs(cli.timeout));

    let source = BingMaps::new(options);
    let started = Instant::now();

    while source.state() == SourceState::Loading {
        std::thread::sleep(Duration::from_millis(50));
    }

    log::info!(
        "Source settled as {:?} after {:?}.",
        source.state(),
        started.elapsed()
    );

    if let Some(error) = source.error() {
        log::error!("{error}");
        return ExitCode::FAILURE;
    }

    report(&source, TileCoord::new(cli.zoom, cli.x, cli.y));
    ExitCode::SUCCESS
}

#[expect(clippy::print_stdout, reason = "output of the program")]
fn report(source: &BingMaps, tile: TileCoord) {
    if let Some(grid) = source.tile_grid() {
        println!(
            "zoom levels: {}..={}, tile size: {}x{}",
            grid.min_zoom(),
            grid.max_zoom(),
            grid.tile_size().width(),
            grid.tile_size().height()
        );
    }

    println!("quadkey: {}", tile.quadkey());

    match source.tile_url(Some(tile), 1., &WebMercator) {
        Some(url) => println!("url: {url}"),
        None => println!("url: none"),
    }

    let extent = source
        .tile_grid()
        .and_then(|grid| grid.tile_coord_extent(tile));

    if let Some(extent) = extent {
        let frame = FrameState {
            zoom: tile.zoom,
            extent,
        };
        for attribution in source.attributions(&frame) {
            println!("attribution: {attribution}");
        }
    }
}
