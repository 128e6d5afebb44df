//! Error types for routing.

use thiserror::Error;

/// Router-specific errors.
///
/// Every variant is a configuration error raised while a route table is being
/// built. A request that matches nothing is not an error; routers report it
/// as `None`.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Invalid path pattern.
    #[error("invalid path pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The pattern as given at registration.
        pattern: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// The same static path was registered twice for one method.
    #[error("duplicate route: {method} {path}")]
    DuplicateRoute { method: String, path: String },

    /// Method name could not be parsed.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// Route name not found.
    #[error("route not found: {0}")]
    RouteNotFound(String),

    /// A route name was registered twice.
    #[error("duplicate route name: {0}")]
    DuplicateRouteName(String),

    /// Reverse lookup was missing a parameter value.
    #[error("missing parameter {key:?} for route {route}")]
    MissingParameter { route: String, key: String },
}

impl RouterError {
    pub(crate) fn invalid_pattern(pattern: &str, reason: &'static str) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        }
    }
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
