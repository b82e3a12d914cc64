//! Error types for zone synchronization
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for synchronization operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the synchronization engine
#[derive(Error, Debug)]
pub enum Error {
    /// A remote call failed: transport error, non-2xx status or malformed body
    #[error("remote API call {endpoint} failed for zone {zone}: {detail}")]
    RemoteApi {
        /// Method and path of the failing call (e.g. "GET /domain/zone/example.com")
        endpoint: String,
        /// Zone the call was issued for (empty for account-wide calls)
        zone: String,
        /// Underlying transport or HTTP error
        detail: String,
    },

    /// The configured API endpoint is not a known region or URL
    #[error("invalid endpoint configuration: {0}")]
    InvalidEndpointConfig(String),

    /// An update or delete targets a record that no longer exists remotely
    #[error("record not found in zone {zone}: {sub_domain} ({field_type})")]
    RecordNotFound {
        /// Zone identifier
        zone: String,
        /// Zone-relative owner name
        sub_domain: String,
        /// Record type
        field_type: String,
    },

    /// Some record operations of a batch failed; applied changes are not rolled back
    #[error("{failed} of {total} change requests failed for zone {zone}: {source}")]
    PartialBatchFailure {
        /// Zone identifier
        zone: String,
        /// Number of failed change requests
        failed: usize,
        /// Number of change requests in the batch
        total: usize,
        /// First error encountered
        #[source]
        source: Box<Error>,
    },

    /// Listing zones or reading a zone state failed
    #[error("{context}: {source}")]
    Listing {
        /// What was being listed
        context: String,
        /// Cause
        #[source]
        source: Box<Error>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a remote API error
    pub fn remote_api(
        endpoint: impl Into<String>,
        zone: impl Into<String>,
        detail: impl std::fmt::Display,
    ) -> Self {
        Self::RemoteApi {
            endpoint: endpoint.into(),
            zone: zone.into(),
            detail: detail.to_string(),
        }
    }

    /// Create an invalid endpoint error
    pub fn invalid_endpoint(msg: impl Into<String>) -> Self {
        Self::InvalidEndpointConfig(msg.into())
    }

    /// Create a "record not found" error
    pub fn record_not_found(
        zone: impl Into<String>,
        sub_domain: impl Into<String>,
        field_type: impl Into<String>,
    ) -> Self {
        Self::RecordNotFound {
            zone: zone.into(),
            sub_domain: sub_domain.into(),
            field_type: field_type.into(),
        }
    }

    /// Wrap an error raised while listing zones or zone records
    pub fn listing(context: impl Into<String>, source: Error) -> Self {
        Self::Listing {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error is a remote call failure, possibly wrapped
    pub fn is_remote(&self) -> bool {
        match self {
            Self::RemoteApi { .. } => true,
            Self::Listing { source, .. } | Self::PartialBatchFailure { source, .. } => {
                source.is_remote()
            }
            _ => false,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_carries_endpoint_and_zone() {
        let err = Error::remote_api("GET /domain/zone/example.com", "example.com", "HTTP 503");
        let msg = err.to_string();
        assert!(msg.contains("GET /domain/zone/example.com"));
        assert!(msg.contains("example.com"));
        assert!(msg.contains("HTTP 503"));
        assert!(err.is_remote());
    }

    #[test]
    fn test_batch_failure_wraps_first_error() {
        let first = Error::remote_api("POST /domain/zone/a.com/record", "a.com", "boom");
        let err = Error::PartialBatchFailure {
            zone: "a.com".to_string(),
            failed: 1,
            total: 3,
            source: Box::new(first),
        };
        assert!(err.to_string().starts_with("1 of 3 change requests failed for zone a.com"));
        assert!(err.is_remote());
        assert!(!Error::config("x").is_remote());
    }
}
