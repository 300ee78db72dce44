// src/github/error.rs
// =============================================================================
// Errors that can happen while talking to the GitHub REST API.
//
// Every page treats these the same way: show a short message in the page and
// carry on. The variants exist so logs (and tests) can tell the cases apart.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never got a response (DNS, TLS, timeout, ...)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// GitHub answered with a non-2xx status
    #[error("HTTP {status}{}", message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status { status: u16, message: Option<String> },

    /// The body was GitHub's error shape: a JSON object with a "message" field
    #[error("API error: {0}")]
    Api(String),

    /// The body was JSON but not the shape we asked for
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A URL could not be built (bad base URL or bad path)
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
}
