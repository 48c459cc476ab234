//! TilePull CLI - bulk tile download from the command line
//!
//! Thin front end over the `tilepull` library: parses a bounding box, zoom
//! levels and throttle options, downloads the covered tiles and writes each
//! payload to `<output>/<z>/<x>/<y><ext>`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tilepull::{
    download_tiles, DownloadConfig, GeoBounds, ThrottleConfig, TileResult, DEFAULT_MAX_IN_FLIGHT,
};

#[derive(Debug, Parser)]
#[command(
    name = "tilepull",
    version,
    about = "Download the map tiles covering a bounding box"
)]
struct Cli {
    /// Tile URL template containing {z}, {x} and {y} placeholders
    #[arg(long)]
    url: String,

    /// Southern edge of the bounding box, degrees
    #[arg(long, allow_hyphen_values = true)]
    min_lat: f64,

    /// Northern edge of the bounding box, degrees
    #[arg(long, allow_hyphen_values = true)]
    max_lat: f64,

    /// Western edge of the bounding box, degrees
    #[arg(long, allow_hyphen_values = true)]
    min_lon: f64,

    /// Eastern edge of the bounding box, degrees
    #[arg(long, allow_hyphen_values = true)]
    max_lon: f64,

    /// Zoom levels to download, comma-separated (e.g. 10,11,12)
    #[arg(long, value_delimiter = ',', required = true)]
    zoom: Vec<u8>,

    /// Directory tiles are written to, as <z>/<x>/<y> files
    #[arg(long, default_value = "tiles")]
    output: PathBuf,

    /// Maximum requests admitted per interval
    #[arg(long, default_value_t = 100)]
    limit: u32,

    /// Throttle interval in milliseconds
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,

    /// Maximum requests in flight at once
    #[arg(long, default_value_t = DEFAULT_MAX_IN_FLIGHT)]
    max_in_flight: usize,
}

impl Cli {
    fn bounds(&self) -> GeoBounds {
        GeoBounds::new(self.min_lat, self.max_lat, self.min_lon, self.max_lon)
    }

    fn download_config(&self) -> DownloadConfig {
        let mut config = DownloadConfig::new(self.url.clone(), self.bounds(), self.zoom.clone());
        config.throttle = Some(ThrottleConfig {
            limit: self.limit,
            interval: Duration::from_millis(self.interval_ms),
        });
        config.max_in_flight = self.max_in_flight;
        config
    }
}

/// File extension for stored tiles, taken from the template's tail after
/// the {y} placeholder (query strings stripped). Empty when the template
/// carries none.
fn tile_extension(url: &str) -> String {
    let Some(tail) = url.split("{y}").nth(1) else {
        return String::new();
    };
    let tail = tail.split('?').next().unwrap_or("");
    if tail.starts_with('.') {
        tail.to_string()
    } else {
        String::new()
    }
}

/// Writes one tile under `<output>/<z>/<x>/<y><ext>`.
fn store_tile(output: &Path, ext: &str, tile: &TileResult) -> std::io::Result<()> {
    let dir = output
        .join(tile.coord.zoom.to_string())
        .join(tile.coord.x.to_string());
    std::fs::create_dir_all(&dir)?;
    std::fs::write(dir.join(format!("{}{}", tile.coord.y, ext)), &tile.data)
}

async fn run(cli: Cli) -> Result<(), tilepull::DownloadError> {
    let bounds = cli.bounds();
    if !bounds.is_well_formed() {
        warn!(?bounds, "bounding box is inverted or outside the Web Mercator range");
    }

    let config = cli.download_config();
    let ext = tile_extension(&cli.url);

    let mut stored = 0usize;
    let mut write_failures = 0usize;
    download_tiles(&config, |tile| match store_tile(&cli.output, &ext, &tile) {
        Ok(()) => stored += 1,
        Err(e) => {
            warn!(coord = %tile.coord, error = %e, "failed to store tile");
            write_failures += 1;
        }
    })
    .await?;

    info!(stored, write_failures, output = %cli.output.display(), "download finished");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "download failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_extension_from_template() {
        assert_eq!(tile_extension("https://t/{z}/{x}/{y}.png"), ".png");
        assert_eq!(tile_extension("https://t/{z}/{x}/{y}.jpg?key=abc"), ".jpg");
        assert_eq!(tile_extension("https://t/{z}/{x}/{y}"), "");
        assert_eq!(tile_extension("https://t/{z}/{x}/{y}/extra"), "");
    }

    #[test]
    fn test_cli_builds_download_config() {
        let cli = Cli::parse_from([
            "tilepull",
            "--url",
            "https://t/{z}/{x}/{y}.png",
            "--min-lat",
            "47.3",
            "--max-lat",
            "47.7",
            "--min-lon",
            "8.4",
            "--max-lon",
            "8.7",
            "--zoom",
            "12,13",
            "--limit",
            "10",
            "--interval-ms",
            "500",
        ]);

        let config = cli.download_config();
        assert_eq!(config.zoom_levels, vec![12, 13]);
        let throttle = config.throttle.expect("throttle set from flags");
        assert_eq!(throttle.limit, 10);
        assert_eq!(throttle.interval, Duration::from_millis(500));
        assert_eq!(config.max_in_flight, DEFAULT_MAX_IN_FLIGHT);
    }

    #[test]
    fn test_cli_accepts_negative_bounds() {
        let cli = Cli::parse_from([
            "tilepull",
            "--url",
            "https://t/{z}/{x}/{y}.png",
            "--min-lat=-10.5",
            "--max-lat=10.5",
            "--min-lon=-20.0",
            "--max-lon=20.0",
            "--zoom",
            "3",
        ]);

        assert!(cli.bounds().is_well_formed());
    }
}
