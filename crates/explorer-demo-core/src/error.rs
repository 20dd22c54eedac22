//! Error types for the Explorer demo core
//!
//! Every failure the URL reconstruction path can hit is represented here so
//! callers can turn it into a single user-facing notice.

use thiserror::Error;

use crate::models::ReferenceKind;

/// Result type alias for Explorer demo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Explorer demo core
#[derive(Debug, Error)]
pub enum Error {
    // ==========================================================================
    // URL Parameter Errors
    // ==========================================================================
    #[error("URL query is not valid JSON: {0}")]
    InvalidUrlJson(#[source] serde_json::Error),

    #[error("Malformed query descriptor at position {position}: {reason}")]
    MalformedDescriptor { position: usize, reason: String },

    #[error("Invalid {kind} reference at position {position}: {reason}")]
    InvalidReference {
        kind: ReferenceKind,
        position: usize,
        reason: String,
    },

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    // ==========================================================================
    // Resource Not Found Errors
    // ==========================================================================
    #[error("Sample search not found: {0}")]
    SampleNotFound(String),

    #[error("{kind} not found: {id}")]
    ReferenceNotFound { kind: ReferenceKind, id: i64 },

    // ==========================================================================
    // Lookup Errors
    // ==========================================================================
    #[error("{kind} lookup failed for query {index}: {message}")]
    LookupFailed {
        kind: ReferenceKind,
        index: u32,
        message: String,
    },

    // ==========================================================================
    // Validation Errors
    // ==========================================================================
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error type string (for JSON output)
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidUrlJson(_)
            | Self::MalformedDescriptor { .. }
            | Self::InvalidReference { .. } => "INVALID_URL_PARAMS",
            Self::InvalidRoute(_) | Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::SampleNotFound(_) | Self::ReferenceNotFound { .. } => "NOT_FOUND",
            Self::LookupFailed { .. } => "LOOKUP_FAILED",
            Self::Io(_) => "OS_ERROR",
            Self::Serialization(_) => "TYPE_ERROR",
        }
    }

    /// Returns whether the user can fix the error by correcting their input
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrlJson(_)
                | Self::MalformedDescriptor { .. }
                | Self::InvalidReference { .. }
                | Self::InvalidRoute(_)
                | Self::InvalidArgument(_)
                | Self::SampleNotFound(_)
                | Self::ReferenceNotFound { .. }
                | Self::LookupFailed { .. }
        )
    }

    /// Whether this error came from reading the shareable URL itself.
    #[must_use]
    pub const fn is_url_params_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrlJson(_)
                | Self::MalformedDescriptor { .. }
                | Self::InvalidReference { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("not-json").unwrap_err()
    }

    #[test]
    fn test_error_type_mapping_exhaustive() {
        let cases: Vec<(Error, &str)> = vec![
            (Error::InvalidUrlJson(json_error()), "INVALID_URL_PARAMS"),
            (
                Error::MalformedDescriptor {
                    position: 0,
                    reason: "x".into(),
                },
                "INVALID_URL_PARAMS",
            ),
            (
                Error::InvalidReference {
                    kind: ReferenceKind::Sources,
                    position: 0,
                    reason: "x".into(),
                },
                "INVALID_URL_PARAMS",
            ),
            (Error::InvalidRoute("x".into()), "INVALID_ARGUMENT"),
            (Error::InvalidArgument("x".into()), "INVALID_ARGUMENT"),
            (Error::SampleNotFound("x".into()), "NOT_FOUND"),
            (
                Error::ReferenceNotFound {
                    kind: ReferenceKind::Collections,
                    id: 1,
                },
                "NOT_FOUND",
            ),
            (
                Error::LookupFailed {
                    kind: ReferenceKind::Sources,
                    index: 0,
                    message: "x".into(),
                },
                "LOOKUP_FAILED",
            ),
            (Error::Io(std::io::Error::other("x")), "OS_ERROR"),
            (Error::Serialization(json_error()), "TYPE_ERROR"),
        ];

        for (err, expected_type) in &cases {
            assert_eq!(
                err.error_type(),
                *expected_type,
                "Error {err:?} should map to {expected_type}"
            );
        }
    }

    #[test]
    fn test_io_and_serialization_are_not_recoverable() {
        assert!(!Error::Io(std::io::Error::other("x")).is_recoverable());
        assert!(!Error::Serialization(json_error()).is_recoverable());
        assert!(Error::SampleNotFound("7".into()).is_recoverable());
    }

    #[test]
    fn test_url_params_classification() {
        assert!(Error::InvalidUrlJson(json_error()).is_url_params_error());
        assert!(!Error::SampleNotFound("x".into()).is_url_params_error());
        assert!(!Error::InvalidRoute("/x".into()).is_url_params_error());
    }

    #[test]
    fn test_display_includes_kind() {
        let err = Error::ReferenceNotFound {
            kind: ReferenceKind::Collections,
            id: 42,
        };
        assert_eq!(err.to_string(), "collections not found: 42");
    }
}
