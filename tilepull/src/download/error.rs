//! Download error types.

use thiserror::Error;

use crate::coord::TileCoord;
use crate::http::HttpError;

/// Errors that can occur while downloading a tile batch.
#[derive(Debug, Clone, Error)]
pub enum DownloadError {
    /// A tile server answered with a non-success status. Carries the
    /// failing tile so callers can report or re-request it.
    #[error("failed to download tile {coord}: HTTP {status}")]
    TileFailed { coord: TileCoord, status: u16 },

    /// The transport itself failed (DNS, connect, timeout, body read) or
    /// the HTTP client could not be built. Propagated unchanged from the
    /// transport collaborator.
    #[error(transparent)]
    Transport(HttpError),

    /// The URL template is missing one of the required placeholders.
    #[error("url template {url:?} is missing the {placeholder} placeholder")]
    BadTemplate {
        url: String,
        placeholder: &'static str,
    },
}
