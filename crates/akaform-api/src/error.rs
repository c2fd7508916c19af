use thiserror::Error;

/// Top-level error type for the `akaform-api` crate.
///
/// Covers every failure mode of the facade: request signing, transport,
/// and the RFC 7807 problem documents the Akamai APIs return.
/// `akaform-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Credentials rejected by the API gateway (401/403).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Request could not be signed (bad client secret, header value, etc.)
    #[error("EdgeGrid signing failed: {0}")]
    Signing(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Problem document returned by an Akamai API.
    #[error("API error (HTTP {status}): {title}{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Api {
        status: u16,
        title: String,
        detail: Option<String>,
        problem_type: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The problem `type` URI, if the API supplied one.
    pub fn problem_type(&self) -> Option<&str> {
        match self {
            Self::Api { problem_type, .. } => problem_type.as_deref(),
            _ => None,
        }
    }
}
