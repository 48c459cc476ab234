//! Tile batch download orchestration.
//!
//! [`TileDownloader`] turns a [`DownloadConfig`] into the full list of
//! covered tiles, then fetches them concurrently: every fetch awaits
//! admission from one shared [`Throttle`], at most `max_in_flight` fetches
//! are in flight at once, and each successful payload is handed to the
//! caller's callback as it completes. The first failure aborts the batch.
//!
//! # Design
//!
//! Fetch futures are polled from a single `FuturesUnordered` on the
//! caller's task and never spawned. That keeps the sliding window simple -
//! seed up to `max_in_flight` fetches, push one replacement per completion -
//! and makes cancellation free: returning the first error drops the stream,
//! which aborts every request still in flight.

mod error;
mod template;

pub use error::DownloadError;
pub use template::UrlTemplate;

use bytes::Bytes;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, trace, warn};

use crate::coord::{compute_tiles, GeoBounds, TileCoord};
use crate::http::{AsyncHttpClient, AsyncReqwestClient, HttpError};
use crate::throttle::{Throttle, ThrottleConfig};

/// Default bound on the number of fetches in flight at once.
///
/// In-flight concurrency is deliberately independent of the throttle: the
/// throttle paces admissions, this caps how many admitted requests can be
/// outstanding, so a huge tile list cannot pin one future per tile.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 256;

/// A successfully downloaded tile: its coordinate plus the raw payload.
///
/// Ownership of the payload moves to the callback; nothing is retained
/// after the callback returns.
#[derive(Debug, Clone)]
pub struct TileResult {
    pub coord: TileCoord,
    pub data: Bytes,
}

/// Configuration for one batch download.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Tile URL template containing `{z}`, `{x}` and `{y}` placeholders.
    pub url: String,
    /// Geographic region to cover.
    pub bounds: GeoBounds,
    /// Zoom levels to cover, processed in order; duplicates are fetched
    /// twice.
    pub zoom_levels: Vec<u8>,
    /// Request rate limit; `None` uses [`ThrottleConfig::default`].
    pub throttle: Option<ThrottleConfig>,
    /// Bound on concurrent fetches, [`DEFAULT_MAX_IN_FLIGHT`] by default.
    pub max_in_flight: usize,
}

impl DownloadConfig {
    /// Creates a configuration with the default throttle and concurrency
    /// settings.
    pub fn new(url: impl Into<String>, bounds: GeoBounds, zoom_levels: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            bounds,
            zoom_levels,
            throttle: None,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

/// Batch tile downloader over an injected HTTP client.
pub struct TileDownloader<C: AsyncHttpClient> {
    http_client: C,
}

impl<C: AsyncHttpClient> TileDownloader<C> {
    /// Creates a downloader using the given HTTP client.
    pub fn new(http_client: C) -> Self {
        Self { http_client }
    }

    /// Downloads every tile covering the configured bounds and zoom levels.
    ///
    /// `on_tile` is invoked exactly once per successfully fetched tile, in
    /// completion order (which depends on server latency, not on the
    /// projected order). The future resolves with `Ok(())` once every tile
    /// has been delivered, or with the first error; on error the remaining
    /// in-flight fetches are aborted and no further callbacks occur.
    pub async fn download_tiles<F>(
        &self,
        config: &DownloadConfig,
        mut on_tile: F,
    ) -> Result<(), DownloadError>
    where
        F: FnMut(TileResult),
    {
        let template = UrlTemplate::new(config.url.as_str())?;
        let tiles = compute_tiles(&config.bounds, &config.zoom_levels);
        let total = tiles.len();
        debug!(total, zoom_levels = ?config.zoom_levels, "projected tile batch");

        if tiles.is_empty() {
            return Ok(());
        }

        let throttle = Throttle::new(config.throttle.unwrap_or_default());
        let window = config.max_in_flight.max(1);

        let mut tiles_iter = tiles.into_iter();
        let mut pending = FuturesUnordered::new();
        for coord in tiles_iter.by_ref().take(window) {
            pending.push(self.fetch_tile(&template, &throttle, coord));
        }

        let mut completed = 0usize;
        while let Some(result) = pending.next().await {
            match result {
                Ok(tile) => {
                    completed += 1;
                    on_tile(tile);
                    if let Some(coord) = tiles_iter.next() {
                        pending.push(self.fetch_tile(&template, &throttle, coord));
                    }
                }
                Err(err) => {
                    warn!(
                        error = %err,
                        completed,
                        aborted = pending.len() + tiles_iter.len(),
                        "tile download failed, aborting batch"
                    );
                    return Err(err);
                }
            }
        }

        info!(completed, "tile batch complete");
        Ok(())
    }

    /// Fetches a single tile: throttle admission, URL substitution, GET.
    async fn fetch_tile(
        &self,
        template: &UrlTemplate,
        throttle: &Throttle,
        coord: TileCoord,
    ) -> Result<TileResult, DownloadError> {
        throttle.acquire().await;

        let url = template.fill(&coord);
        trace!(%coord, url, "fetching tile");

        let data = self.http_client.get(&url).await.map_err(|e| match e {
            HttpError::Status { status, .. } => DownloadError::TileFailed { coord, status },
            transport => DownloadError::Transport(transport),
        })?;

        Ok(TileResult { coord, data })
    }
}

/// Downloads a tile batch with the default reqwest-backed client.
///
/// Convenience wrapper over [`TileDownloader`] for callers that do not need
/// to inject their own transport.
pub async fn download_tiles<F>(config: &DownloadConfig, on_tile: F) -> Result<(), DownloadError>
where
    F: FnMut(TileResult),
{
    let client = AsyncReqwestClient::new().map_err(DownloadError::Transport)?;
    TileDownloader::new(client).download_tiles(config, on_tile).await
}
