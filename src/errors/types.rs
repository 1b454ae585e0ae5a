//! Error types for the connect-notify core
//!
//! Every fallible step inside the notification pipeline returns a
//! [`NotifyResult`]. None of these errors cross the host boundary: the public
//! lifecycle entry points log them and fall back to defaults.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the notification pipeline
///
/// Organized by the stage that produced it so log lines can be grouped.
/// Display strings never carry a full webhook URL, since its last path
/// segment is the webhook token.
#[derive(Error, Debug)]
pub enum NotifyError {
    // Configuration errors
    #[error("Configuration error: {message}: {source}")]
    Config {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    // I/O errors
    #[error("Failed to {operation} '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("YAML error in '{path}': {context}")]
    Yaml {
        path: PathBuf,
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("JSON serialization error: {context}")]
    Json {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Network and HTTP errors
    #[error("Invalid webhook URL: {source}")]
    InvalidUrl {
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP request to {origin} failed: {cause}")]
    Http {
        origin: String,
        cause: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Network timeout after {timeout_secs} seconds to {origin}: {cause}")]
    Timeout {
        origin: String,
        timeout_secs: u64,
        cause: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Convenience type alias for Results using NotifyError
pub type NotifyResult<T> = Result<T, NotifyError>;

impl NotifyError {
    /// Create a new Config error with source
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Create a new I/O error with source
    pub fn io_with_source(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create a new YAML error with source
    pub fn yaml_with_source(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::Yaml {
            path: path.into(),
            context: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new invalid URL error
    pub fn invalid_url(source: url::ParseError) -> Self {
        Self::InvalidUrl { source }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } | Self::ConfigNotFound { .. } => "config",
            Self::Io { .. } => "io",
            Self::Yaml { .. } | Self::Json { .. } => "serialization",
            Self::InvalidUrl { .. } | Self::Http { .. } | Self::Timeout { .. } => "network",
        }
    }
}

/// Scheme, host and port of `url`, without the path holding the token
pub fn redacted_origin(url: &url::Url) -> String {
    url.origin().ascii_serialization()
}

/// Joins an error and its sources with `": "`
fn cause_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl From<serde_json::Error> for NotifyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            context: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        let origin = err
            .url()
            .map(redacted_origin)
            .unwrap_or_else(|| "unknown".to_string());
        // reqwest prints the full URL in its own message
        let err = err.without_url();
        let cause = cause_chain(&err);

        if err.is_timeout() {
            let timeout_secs = if err.is_connect() {
                crate::webhook::CONNECT_TIMEOUT_SECS
            } else {
                crate::webhook::REQUEST_TIMEOUT_SECS
            };
            Self::Timeout {
                origin,
                timeout_secs,
                cause,
                source: Some(Box::new(err)),
            }
        } else {
            Self::Http {
                origin,
                cause,
                source: Some(Box::new(err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_includes_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err = NotifyError::io_with_source("config.yml", "read config file", io);
        assert_eq!(
            err.to_string(),
            "Failed to read config file 'config.yml': permission denied"
        );
        assert_eq!(err.category(), "io");
    }

    #[test]
    fn test_redacted_origin_drops_token() {
        let url = url::Url::parse("https://discord.com/api/webhooks/123/secret-token").unwrap();
        assert_eq!(redacted_origin(&url), "https://discord.com");

        let url = url::Url::parse("http://127.0.0.1:8080/api/webhooks/1/t").unwrap();
        assert_eq!(redacted_origin(&url), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_cause_chain_single_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        assert_eq!(cause_chain(&io), "connection refused");
    }

    #[test]
    fn test_invalid_url_message() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err = NotifyError::invalid_url(parse_err);
        assert_eq!(err.to_string(), "Invalid webhook URL: relative URL without a base");
        assert_eq!(err.category(), "network");
    }
}
