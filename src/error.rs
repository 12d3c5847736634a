//! Error type shared by loaders, the layout controller and the image cache.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashError>;

#[derive(Debug, Error)]
pub enum DashError {
    // ── Configuration ───────────────────────────────────────────────
    /// A configured widget id has no registered loader.
    #[error("Unknown widget in configuration: {0}")]
    UnknownWidget(String),

    /// A route referenced a service the dashboard knows nothing about.
    #[error("Unknown service: {0}")]
    UnknownService(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("Upstream returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Decode { message: String, body: String },

    /// Upstream answered but reported the entity as missing.
    #[error("{0}")]
    NotFound(String),

    // ── Layout ──────────────────────────────────────────────────────
    /// A row would hold more widgets than allowed.
    #[error("Row {row} is full ({max} widgets max)")]
    RowFull { row: usize, max: usize },

    /// Layout operation not valid in the current editor state or position.
    #[error("Invalid layout operation: {0}")]
    InvalidLayout(String),

    // ── Artwork ─────────────────────────────────────────────────────
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashError {
    pub(crate) fn decode(err: serde_json::Error, body: &str) -> Self {
        DashError::Decode {
            message: err.to_string(),
            body: body.chars().take(512).collect(),
        }
    }

    /// True when the failure came from talking to an upstream service.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            DashError::Transport(_) | DashError::Status { .. } | DashError::Decode { .. }
        )
    }
}
