//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError`, `ConfigError` and failed refreshes into user-facing
//! errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use coronatracker_config::ConfigError;
use coronatracker_core::{CoreError, FetchResult};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const SERVER: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Refresh ──────────────────────────────────────────────────────
    #[error("{}", .result.message())]
    #[diagnostic(
        code(coronatracker::fetch_failed),
        help("Retry: coronatracker {command} --force")
    )]
    Fetch {
        result: FetchResult,
        command: String,
    },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the statistics API at {url}: {reason}")]
    #[diagnostic(
        code(coronatracker::connection_failed),
        help("Check your network connection or override the endpoint with --api-url.")
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Server responded with HTTP {status}")]
    #[diagnostic(code(coronatracker::server_error), help("{message}"))]
    Server { status: u16, message: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(coronatracker::timeout),
        help("Increase timeout with --timeout or try again later.")
    )]
    Timeout { seconds: u64 },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Country '{query}' not found")]
    #[diagnostic(
        code(coronatracker::country_not_found),
        help("Run: coronatracker countries to see available countries")
    )]
    CountryNotFound { query: String },

    #[error("Operation not supported: {operation}")]
    #[diagnostic(code(coronatracker::unsupported))]
    Unsupported { operation: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(coronatracker::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(coronatracker::config_exists),
        help("Use --overwrite to replace it, or edit values with: coronatracker config set")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(coronatracker::config))]
    Config(Box<figment::Error>),

    // ── Internal / IO ────────────────────────────────────────────────
    #[error("Unexpected error: {message}")]
    #[diagnostic(code(coronatracker::internal))]
    Internal { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Error for a refresh that ended with `result`.
    pub fn fetch(result: FetchResult, command: impl Into<String>) -> Self {
        Self::Fetch {
            result,
            command: command.into(),
        }
    }

    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Fetch { result, .. } => match result {
                FetchResult::NetworkError => exit_code::CONNECTION,
                FetchResult::ServerError => exit_code::SERVER,
                FetchResult::Success | FetchResult::UnexpectedError => exit_code::GENERAL,
            },
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Server { .. } => exit_code::SERVER,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::CountryNotFound { .. } => exit_code::NOT_FOUND,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. } | Self::ConfigExists { .. } | Self::Config(_) => {
                exit_code::USAGE
            }
            Self::Internal { .. } | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Server { status, message } => CliError::Server { status, message },

            CoreError::Network { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::CountryNotFound { name } => CliError::CountryNotFound { query: name },

            CoreError::Unsupported { operation } => CliError::Unsupported { operation },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Deserialization { message } | CoreError::Internal(message) => {
                CliError::Internal { message }
            }
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: format!("failed to serialize config: {e}"),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
