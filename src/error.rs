//! Error types shared by the catalog and audio layers.
//!
//! Nothing here is fatal to the player: callers log these and degrade to an
//! empty result for the unit of work that failed.

/// Failure while reading something from the music server.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Transport-level failure (connection refused, timeout, TLS...).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    /// The body was not the JSON we expected.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A path could not be joined onto the base URL.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The requested path is unknown (only produced by in-memory fetchers).
    #[error("not found: {0}")]
    NotFound(String),
}

/// Failure while starting playback of a source.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("could not fetch audio: {0}")]
    Fetch(#[from] CatalogError),

    #[error("could not decode audio: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    #[error("no audio output device: {0}")]
    NoOutput(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
