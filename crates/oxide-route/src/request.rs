//! HTTP request type.

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::RouterError;
use crate::matcher::PathMatch;
use crate::params::{Params, RouteMatch};

/// HTTP request methods.
///
/// The declaration order is the order methods are listed in `Allow` headers.
/// Extension methods such as `PROPFIND` sort after the standard ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    /// GET method
    Get,
    /// HEAD method
    Head,
    /// POST method
    Post,
    /// PUT method
    Put,
    /// PATCH method
    Patch,
    /// DELETE method
    Delete,
    /// CONNECT method
    Connect,
    /// OPTIONS method
    Options,
    /// TRACE method
    Trace,
    /// Any other method token, upper-cased.
    Other(String),
}

impl Method {
    /// Every standard method, in canonical order.
    pub const ALL: [Self; 9] = [
        Self::Get,
        Self::Head,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
        Self::Connect,
        Self::Options,
        Self::Trace,
    ];

    /// Returns the method as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Connect => "CONNECT",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
            Self::Other(name) => name,
        }
    }
}

/// Characters allowed in a method token.
fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

impl FromStr for Method {
    type Err = RouterError;

    /// Parses a method name case-insensitively. Names outside the standard
    /// set become [`Method::Other`] as long as they are valid tokens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(method) = Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
        {
            return Ok(method);
        }
        if s.is_empty() || !s.chars().all(is_token_char) {
            return Err(RouterError::UnknownMethod(s.to_string()));
        }
        Ok(Self::Other(s.to_ascii_uppercase()))
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request.
///
/// Besides the usual request data, a request carries the state of the route
/// that matched it: the matched pattern and its bound parameters. That state
/// is released by the serving handler, by [`Request::recycle`], when the
/// path is changed with [`Request::set_path`], or when the request is
/// dropped. Bound parameters point into the path, so the path can only be
/// changed through `set_path`.
#[derive(Debug)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Query string parameters.
    pub query: HashMap<String, String>,
    /// Request headers.
    pub headers: HashMap<String, String>,
    path: String,
    raw_query: String,
    comparison: PathMatch,
    matched: Option<RouteMatch>,
}

impl Request {
    /// Creates a new request.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            query: HashMap::new(),
            headers: HashMap::new(),
            path: path.into(),
            raw_query: String::new(),
            comparison: PathMatch::Exact,
            matched: None,
        }
    }

    /// Creates a request from a request target such as `/search?q=rust`.
    ///
    /// The query string is kept as received, next to its decoded pairs.
    pub fn from_target(method: Method, target: &str) -> Self {
        match target.split_once('?') {
            Some((path, query)) => {
                let mut req = Self::new(method, path);
                req.query = Self::parse_query_string(query);
                req.raw_query = query.to_string();
                req
            }
            None => Self::new(method, target),
        }
    }

    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Creates a copy of this request for another path, without any match.
    ///
    /// Used to test alternative paths without touching the original request.
    #[must_use]
    pub fn probe(&self, path: impl Into<String>) -> Self {
        Self {
            method: self.method.clone(),
            query: self.query.clone(),
            headers: self.headers.clone(),
            path: path.into(),
            raw_query: self.raw_query.clone(),
            comparison: self.comparison,
            matched: None,
        }
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets a query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Sets how routers compare literal path text for this request.
    #[must_use]
    pub fn compare_with(mut self, comparison: PathMatch) -> Self {
        self.comparison = comparison;
        self
    }

    /// Returns how routers compare literal path text for this request.
    pub fn comparison(&self) -> PathMatch {
        self.comparison
    }

    /// Changes how routers compare literal path text for this request.
    pub fn set_comparison(&mut self, comparison: PathMatch) {
        self.comparison = comparison;
    }

    /// Gets a header value.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Gets a query parameter.
    pub fn get_query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Returns the request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Replaces the request path, releasing the current route match.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.recycle();
        self.path = path.into();
    }

    /// Returns the query string as received, without the leading `?`.
    ///
    /// Empty for requests not built with [`Request::from_target`].
    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    /// Returns the parameters bound by the matched route.
    ///
    /// Empty when nothing matched or the route had no parameters.
    pub fn params(&self) -> Params<'_> {
        Params::new(&self.path, self.matched.as_ref())
    }

    /// Returns the pattern of the matched route.
    pub fn pattern(&self) -> Option<&str> {
        self.matched.as_ref().map(|m| m.pattern().as_str())
    }

    /// Returns the current route match.
    pub fn route_match(&self) -> Option<&RouteMatch> {
        self.matched.as_ref()
    }

    /// Releases the current route match back to its pool.
    ///
    /// Call this after testing a request against a router without serving
    /// it. Recycling a request with no match is a no-op.
    pub fn recycle(&mut self) {
        self.matched = None;
    }

    pub(crate) fn attach(&mut self, matched: RouteMatch) {
        self.matched = Some(matched);
    }

    /// Parses query parameters from a query string.
    pub fn parse_query_string(query: &str) -> HashMap<String, String> {
        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(key), decode(value))
            })
            .collect()
    }
}

fn decode(s: &str) -> String {
    let s = s.replace('+', " ");
    match urlencoding::decode(&s) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => s,
    }
}
