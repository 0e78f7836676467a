// ── Core error types ──
//
// User-facing errors from coronatracker-core. Consumers never see reqwest
// errors directly. The `From<coronatracker_api::Error>` impl translates
// transport-layer errors into the server / network / data split that
// `FetchResult` classification relies on.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Remote errors ────────────────────────────────────────────────
    #[error("Server responded with HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Cannot reach {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Malformed response: {message}")]
    Deserialization { message: String },

    #[error("Country not found: {name}")]
    CountryNotFound { name: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation not supported: {operation}")]
    Unsupported { operation: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for connectivity failures (including timeouts).
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<coronatracker_api::Error> for CoreError {
    fn from(err: coronatracker_api::Error) -> Self {
        use coronatracker_api::Error as ApiError;

        match err {
            ApiError::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if let Some(status) = e.status() {
                    CoreError::Server {
                        status: status.as_u16(),
                        message: e.to_string(),
                    }
                } else if e.is_connect() || e.is_request() {
                    CoreError::Network {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else if e.is_decode() || e.is_body() {
                    CoreError::Deserialization {
                        message: e.to_string(),
                    }
                } else {
                    CoreError::Internal(e.to_string())
                }
            }
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            ApiError::Server { status, message } => CoreError::Server { status, message },
            ApiError::Deserialization { message, body: _ } => {
                CoreError::Deserialization { message }
            }
        }
    }
}
