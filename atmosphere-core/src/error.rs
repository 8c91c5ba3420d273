use serde::Deserialize;
use thiserror::Error;

/// Failure of a single fetch. Displays as the message shown to the user.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Transport-level failures: the request never produced a usable body.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Network error: {status}")]
    Status { status: u16 },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Malformed response body: {0}")]
    Body(String),
}

/// Application-level failure reported by Weatherstack in a
/// `{"success": false, "error": {...}}` body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub code: i64,
    pub kind: String,
    pub info: Option<String>,
    message: String,
}

impl ProviderError {
    /// `fallback` is used as the message when the provider sent no `info`.
    pub fn new(code: i64, kind: impl Into<String>, info: Option<String>, fallback: &str) -> Self {
        let info = info.filter(|s| !s.trim().is_empty());
        let message = info.clone().unwrap_or_else(|| fallback.to_string());
        Self { code, kind: kind.into(), info, message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn from_envelope(envelope: ErrorEnvelope, fallback: &str) -> Self {
        let body = envelope.error.unwrap_or_default();
        Self::new(body.code, body.kind, body.info, fallback)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub code: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub info: Option<String>,
}
