// ── Fetch outcomes ──
//
// The four-way classification surfaced to users after a refresh attempt.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::error::CoreError;

/// Outcome of a single refresh attempt.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FetchResult {
    Success,
    ServerError,
    NetworkError,
    UnexpectedError,
}

impl FetchResult {
    pub fn is_error(self) -> bool {
        !matches!(self, Self::Success)
    }

    /// Short user-facing message (what a snackbar shows).
    pub fn message(self) -> &'static str {
        match self {
            Self::Success => "Data refreshed",
            Self::ServerError => "Server error",
            Self::NetworkError => "Network error",
            Self::UnexpectedError => "Unexpected error",
        }
    }
}

impl From<&CoreError> for FetchResult {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::Server { .. } => Self::ServerError,
            CoreError::Network { .. } | CoreError::Timeout { .. } => Self::NetworkError,
            CoreError::Deserialization { .. }
            | CoreError::CountryNotFound { .. }
            | CoreError::Unsupported { .. }
            | CoreError::Config { .. }
            | CoreError::Internal(_) => Self::UnexpectedError,
        }
    }
}

impl<T> From<&Result<T, CoreError>> for FetchResult {
    fn from(outcome: &Result<T, CoreError>) -> Self {
        match outcome {
            Ok(_) => Self::Success,
            Err(e) => Self::from(e),
        }
    }
}
