//! Path pattern compilation.

use crate::error::{Result, RouterError};
use crate::matcher::{self, PathMatch};
use crate::params::ParamPool;

/// A segment in a compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A literal segment, stored with its leading separator (e.g. `/users`).
    Static(String),
    /// A named parameter (e.g. `:id`), capturing exactly one path segment.
    Named(String),
    /// A catch-all parameter (e.g. `*path`), capturing the path remainder.
    CatchAll(String),
}

/// A compiled path pattern.
///
/// Patterns are compiled once at registration and never change afterwards.
/// Each dynamic pattern owns the pool its parameter buffers are drawn from.
#[derive(Debug)]
pub struct Pattern {
    /// The normalized pattern string.
    pattern: String,
    /// Parsed segments.
    segments: Vec<Segment>,
    /// Parameter names in order.
    keys: Vec<String>,
    /// Whether a match must end with a separator.
    trailing_slash: bool,
    /// Reusable parameter buffers.
    pool: ParamPool,
}

impl Pattern {
    /// Parses and validates a path pattern.
    ///
    /// Pattern syntax:
    /// - `/users` - Literal path
    /// - `/users/:id` - Named parameter, matches one segment
    /// - `/files/*path` - Catch-all, matches the rest of the path
    ///
    /// A trailing `/` is kept and has to be matched as well.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_route::Pattern;
    ///
    /// let pattern = Pattern::parse("/posts/:id/comments/:comment_id").unwrap();
    /// let params = pattern.match_path("/posts/123/comments/456").unwrap();
    /// assert_eq!(params, vec![("id", "123"), ("comment_id", "456")]);
    ///
    /// assert!(Pattern::parse("/posts/:").is_err());
    /// ```
    pub fn parse(path: &str) -> Result<Self> {
        let pattern = format!("/{}", path.trim_start_matches('/'));

        if !pattern.contains([':', '*']) {
            return Ok(Self {
                segments: vec![Segment::Static(pattern.clone())],
                keys: Vec::new(),
                trailing_slash: pattern.len() > 1 && pattern.ends_with('/'),
                pool: ParamPool::new(0),
                pattern,
            });
        }

        let parts: Vec<&str> = pattern.trim_matches('/').split('/').collect();
        let mut segments = Vec::with_capacity(parts.len());
        let mut keys = Vec::new();

        for (i, part) in parts.iter().enumerate() {
            let Some(pos) = part.find([':', '*']) else {
                segments.push(Segment::Static(format!("/{part}")));
                continue;
            };

            if pos != 0 {
                return Err(RouterError::invalid_pattern(
                    &pattern,
                    "marker must follow a separator",
                ));
            }
            if part.len() == 1 {
                return Err(RouterError::invalid_pattern(&pattern, "marker must be named"));
            }
            if part.starts_with('*') && i + 1 != parts.len() {
                return Err(RouterError::invalid_pattern(
                    &pattern,
                    "catch-all must be last",
                ));
            }
            if part[1..].contains([':', '*']) {
                return Err(RouterError::invalid_pattern(
                    &pattern,
                    "only one parameter per segment",
                ));
            }

            let name = part[1..].to_string();
            keys.push(name.clone());
            if part.starts_with('*') {
                segments.push(Segment::CatchAll(name));
            } else {
                segments.push(Segment::Named(name));
            }
        }

        Ok(Self {
            trailing_slash: pattern.ends_with('/'),
            pool: ParamPool::new(keys.len()),
            pattern,
            segments,
            keys,
        })
    }

    /// Returns the normalized pattern string.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns the parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the parameter names in pattern order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns the number of parameters in this pattern.
    pub fn param_count(&self) -> usize {
        self.keys.len()
    }

    /// Returns true when the pattern has no parameters.
    pub fn is_static(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns true when matches must end with a separator.
    pub fn has_trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// Returns the pool of parameter buffers owned by this pattern.
    pub fn pool(&self) -> &ParamPool {
        &self.pool
    }

    /// Matches a path exactly, returning the bound parameters.
    ///
    /// This allocates the result and is meant for inspection and tests; the
    /// routers go through the pooled buffers instead.
    pub fn match_path<'a>(&'a self, path: &'a str) -> Option<Vec<(&'a str, &'a str)>> {
        if self.is_static() {
            return (path == self.pattern).then(Vec::new);
        }

        let mut ranges = Vec::with_capacity(self.keys.len());
        if !matcher::match_segments(self, path, PathMatch::Exact, &mut ranges) {
            return None;
        }

        Some(
            self.keys
                .iter()
                .zip(ranges)
                .map(|(key, range)| (key.as_str(), &path[range]))
                .collect(),
        )
    }

    /// Builds a concrete path from parameter values given in pattern order.
    ///
    /// Literal segments are taken from the pattern itself. A catch-all value
    /// carries its own leading separator; one is added when missing.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_route::Pattern;
    ///
    /// let pattern = Pattern::parse("/posts/:id/").unwrap();
    /// assert_eq!(pattern.expand(["123"]), "/posts/123/");
    /// ```
    pub fn expand<'v>(&self, values: impl IntoIterator<Item = &'v str>) -> String {
        if self.is_static() {
            return self.pattern.clone();
        }

        let mut values = values.into_iter();
        let mut path = String::with_capacity(self.pattern.len());

        for segment in &self.segments {
            match segment {
                Segment::Static(text) => path.push_str(text),
                Segment::Named(_) => {
                    path.push('/');
                    path.push_str(values.next().unwrap_or_default());
                }
                Segment::CatchAll(_) => {
                    let rest = values.next().unwrap_or_default();
                    if !rest.starts_with('/') {
                        path.push('/');
                    }
                    path.push_str(rest);
                    return path;
                }
            }
        }

        if self.trailing_slash {
            path.push('/');
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(pattern: &str) -> &'static str {
        match Pattern::parse(pattern) {
            Err(RouterError::InvalidPattern { reason, .. }) => reason,
            other => panic!("expected invalid pattern for {pattern}, got {other:?}"),
        }
    }

    #[test]
    fn test_normalizes_leading_separator() {
        assert_eq!(Pattern::parse("users").unwrap().as_str(), "/users");
        assert_eq!(Pattern::parse("///users/:id").unwrap().as_str(), "/users/:id");
        assert_eq!(Pattern::parse("").unwrap().as_str(), "/");
    }

    #[test]
    fn test_static_pattern() {
        let pattern = Pattern::parse("/users/hello/").unwrap();
        assert!(pattern.is_static());
        assert!(pattern.has_trailing_slash());
        assert_eq!(pattern.param_count(), 0);
        assert_eq!(pattern.pool().capacity(), 0);
    }

    #[test]
    fn test_dynamic_segments() {
        let pattern = Pattern::parse("/category/:cid/product/*rest").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Static("/category".into()),
                Segment::Named("cid".into()),
                Segment::Static("/product".into()),
                Segment::CatchAll("rest".into()),
            ]
        );
        assert_eq!(pattern.keys(), &["cid".to_string(), "rest".to_string()]);
        assert_eq!(pattern.pool().capacity(), 2);
        assert!(!pattern.has_trailing_slash());
    }

    #[test]
    fn test_trailing_slash_is_kept() {
        let pattern = Pattern::parse("/users/:id/:bid/").unwrap();
        assert!(pattern.has_trailing_slash());
        assert_eq!(pattern.param_count(), 2);
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(reason("/path/*"), "marker must be named");
        assert_eq!(reason("/path/:/a"), "marker must be named");
        assert_eq!(reason("/pa:/a"), "marker must follow a separator");
        assert_eq!(reason("/a/b*"), "marker must follow a separator");
        assert_eq!(reason("/:user:/id"), "only one parameter per segment");
        assert_eq!(reason("/path/*all/more"), "catch-all must be last");
    }

    #[test]
    fn test_error_message() {
        let err = Pattern::parse("/pa:/a").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid path pattern \"/pa:/a\": marker must follow a separator"
        );
    }

    #[test]
    fn test_expand() {
        let pattern = Pattern::parse("/repos/:owner/:repo/issues").unwrap();
        assert_eq!(pattern.expand(["rust", "cargo"]), "/repos/rust/cargo/issues");

        let files = Pattern::parse("/files/*path").unwrap();
        assert_eq!(files.expand(["/css/site.css"]), "/files/css/site.css");
        assert_eq!(files.expand(["css/site.css"]), "/files/css/site.css");

        let fixed = Pattern::parse("/about/").unwrap();
        assert_eq!(fixed.expand([]), "/about/");
    }
}
