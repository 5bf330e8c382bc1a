//! Error types for cfzone
//!
//! This module defines all error types used throughout the workspace.

use thiserror::Error;

use crate::model::ApiMessage;

/// Result type alias for cfzone operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message Cloudflare returns when an update would duplicate an existing record
const RECORD_ALREADY_EXISTS: &str = "Record already exists.";

/// Core error type for cfzone
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing file, missing token, missing IP sources)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller-supplied domain or IP failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Every public-IP source failed
    #[error("No IP source available: all {attempted} source(s) failed")]
    NoIpSourceAvailable {
        /// Number of sources that were tried
        attempted: usize,
    },

    /// The provider accepted the request but reported `success: false`
    #[error("Provider rejected the update: {}", format_messages(.0))]
    ProviderValidation(Vec<ApiMessage>),

    /// The provider answered with a non-2xx status and a structured error body
    #[error("API error ({provider}, HTTP {status}): {message}")]
    Api {
        /// Provider name
        provider: String,
        /// HTTP status code
        status: u16,
        /// First provider error code, if any
        code: Option<i64>,
        /// First provider error message, verbatim
        message: String,
    },

    /// IP change cache errors
    #[error("IP cache error: {0}")]
    Cache(String),

    /// Response body did not match the expected JSON shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Provider-specific error without a structured body
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a cache error
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a structured API error
    pub fn api(
        provider: impl Into<String>,
        status: u16,
        code: Option<i64>,
        message: impl Into<String>,
    ) -> Self {
        Self::Api {
            provider: provider.into(),
            status,
            code,
            message: message.into(),
        }
    }

    /// Whether this error means the desired record is already in place.
    ///
    /// Cloudflare exposes no dedicated error code for this condition, so the
    /// match is on the exact message text. Every call site goes through here.
    pub fn is_record_already_exists(&self) -> bool {
        matches!(self, Self::Api { message, .. } if message == RECORD_ALREADY_EXISTS)
    }

    /// Whether this error is a configuration or input problem
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidInput(_))
    }
}

fn format_messages(messages: &[ApiMessage]) -> String {
    if messages.is_empty() {
        return "no error details returned".to_string();
    }
    messages
        .iter()
        .map(|m| format!("[{}] {}", m.code, m.message))
        .collect::<Vec<_>>()
        .join("; ")
}
