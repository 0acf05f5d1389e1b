//! Error types for route enumeration, origin parsing, and document rendering.

use thiserror::Error;

/// Errors produced by the classification engine and its generators.
///
/// Variants carry rendered messages rather than source errors so a failed
/// render can be handed to every caller waiting on the same document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RobotoError {
    /// The host failed while enumerating its routes.
    #[error("route enumeration failed: {0}")]
    RouteSource(String),

    /// A registered handler cannot be turned into a route descriptor.
    #[error("invalid route {handler}: {reason}")]
    InvalidRoute { handler: String, reason: String },

    /// The serving origin could not be parsed.
    #[error("invalid request origin {input:?}: {reason}")]
    InvalidOrigin { input: String, reason: String },

    /// Serializing a document failed.
    #[error("failed to render {document}: {reason}")]
    Render {
        document: &'static str,
        reason: String,
    },

    /// The configuration file could not be read or parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl RobotoError {
    /// Wrap any displayable host failure as a route enumeration error.
    pub fn route_source(err: impl std::fmt::Display) -> Self {
        Self::RouteSource(err.to_string())
    }
}

/// Result type alias using [`RobotoError`].
pub type Result<T> = std::result::Result<T, RobotoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RobotoError::InvalidRoute {
            handler: "FooController::foo1".into(),
            reason: "no paths bound".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid route FooController::foo1: no paths bound"
        );

        let err = RobotoError::route_source("database offline");
        assert_eq!(err.to_string(), "route enumeration failed: database offline");
    }
}
