//! Mux configuration.

use serde::{Deserialize, Serialize};

/// Fallback behavior of a [`Mux`](crate::Mux) when a request does not match
/// a route directly.
///
/// Every option is enabled by default. Missing fields in a JSON document
/// keep their default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MuxConfig {
    /// Redirect to the same path with the trailing slash added or removed
    /// when only that path has a route.
    pub redirect_trailing_slash: bool,
    /// Redirect to the cleaned path (no repeated slashes, `.` or `..`), and
    /// to a route matching the path case-insensitively.
    pub redirect_fixed_path: bool,
    /// Answer `OPTIONS` requests with the allowed methods when no `OPTIONS`
    /// route matches.
    pub auto_options: bool,
}

impl Default for MuxConfig {
    fn default() -> Self {
        Self {
            redirect_trailing_slash: true,
            redirect_fixed_path: true,
            auto_options: true,
        }
    }
}

impl MuxConfig {
    /// Parses the configuration from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Disables every fallback.
    pub fn strict() -> Self {
        Self {
            redirect_trailing_slash: false,
            redirect_fixed_path: false,
            auto_options: false,
        }
    }
}
