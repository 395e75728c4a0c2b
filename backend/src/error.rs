//! Error types for the Cascades feed pipeline.
//!
//! This module defines the error hierarchy:
//!
//! - [`SourceError`] - A single data source could not produce a result
//! - [`ConfigError`] - The feed configuration could not be loaded
//! - [`ServerError`] - HTTP server startup/serve errors
//!
//! None of these ever reach the rendering layer. A [`SourceError`] on the
//! primary source triggers the next source in the chain, and a failure of the
//! last source turns into an empty feed. Rows dropped by the mapper are not
//! errors at all, see [`crate::transform::SkippedRow`].

use thiserror::Error;

// =============================================================================
// Source Errors
// =============================================================================

/// Errors while loading one source of a feed.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The server answered with a non-success status.
    #[error("{url} answered HTTP {status}")]
    Fetch { url: String, status: u16 },

    /// The request could not be sent or the body could not be read.
    #[error("HTTP request to {url} failed: {message}")]
    Http { url: String, message: String },

    /// The response or file carried no usable rows.
    #[error("{0} is empty")]
    Empty(String),

    /// The payload could not be decoded.
    #[error("Could not parse {origin}: {message}")]
    Parse { origin: String, message: String },

    /// A bundled file could not be read.
    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    pub fn parse(origin: impl Into<String>, message: impl Into<String>) -> Self {
        SourceError::Parse {
            origin: origin.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading the feed configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration file is not valid JSON for the expected shape.
    #[error("Invalid config JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Could not bind or serve.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Site root does not exist.
    #[error("Site root not found: {0}")]
    MissingSiteRoot(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_format() {
        let err = SourceError::Fetch {
            url: "https://sheets.example.com/shows.csv".into(),
            status: 404,
        };
        let msg = err.to_string();
        assert!(msg.contains("shows.csv"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn test_config_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ConfigError = json_err.into();
        assert!(err.to_string().starts_with("Invalid config JSON"));
    }
}
