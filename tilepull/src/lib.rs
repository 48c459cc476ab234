//! TilePull - rate-limited batch downloader for Web Mercator map tiles
//!
//! This library computes the set of tile coordinates covering a geographic
//! bounding box across a list of zoom levels, then fetches the corresponding
//! tile images from a templated HTTP endpoint under a rolling rate limit,
//! handing each payload to a caller-supplied callback.
//!
//! # Example
//!
//! ```no_run
//! use tilepull::{download_tiles, DownloadConfig, GeoBounds};
//!
//! # async fn run() -> Result<(), tilepull::DownloadError> {
//! let config = DownloadConfig::new(
//!     "https://tile.example.com/{z}/{x}/{y}.png",
//!     GeoBounds::new(47.3, 47.7, 8.4, 8.7),
//!     vec![12, 13],
//! );
//!
//! download_tiles(&config, |tile| {
//!     println!("got {} ({} bytes)", tile.coord, tile.data.len());
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod coord;
pub mod download;
pub mod http;
pub mod throttle;

pub use coord::{compute_tiles, lat_to_tile_y, lon_to_tile_x, GeoBounds, TileCoord};
pub use download::{
    download_tiles, DownloadConfig, DownloadError, TileDownloader, TileResult, UrlTemplate,
    DEFAULT_MAX_IN_FLIGHT,
};
pub use http::{AsyncHttpClient, AsyncReqwestClient, HttpError};
pub use throttle::{Throttle, ThrottleConfig};
