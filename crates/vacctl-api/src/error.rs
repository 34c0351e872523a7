use thiserror::Error;

/// Top-level error type for the `vacctl-api` crate.
///
/// Covers transport failures, non-success HTTP responses, and bodies that
/// do not decode into the expected wire shape. `vacctl-core` maps these
/// into its canonical error taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Device responses ────────────────────────────────────────────
    /// The device answered with a non-success status code.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the body arrived but could not be decoded.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Deserialization { .. })
    }

    /// Build a [`Deserialization`](Self::Deserialization) error from a serde
    /// failure, keeping a short preview of the offending body in the message.
    pub(crate) fn decode(err: &serde_json::Error, body: &[u8]) -> Self {
        let body = String::from_utf8_lossy(body).into_owned();
        let preview: String = body.chars().take(200).collect();
        Self::Deserialization {
            message: format!("{err} (body preview: {preview:?})"),
            body,
        }
    }
}
