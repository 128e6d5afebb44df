//! Method dispatch with redirect, OPTIONS and 405 handling.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use oxide_route::{
    Chain, Handler, Method, PathMatch, Pattern, Request, Response, Result, RouteRegistry, Router,
    RouterError, Segment, SharedHandler, StaticRouter, route_pattern, serve_routed,
};
use tracing::debug;

use crate::clean::{clean_path, toggle_trailing_slash};
use crate::config::MuxConfig;

/// The routes of one method.
///
/// Static paths are looked up by exact path first; routes with parameters
/// are tried afterwards, in registration order.
#[derive(Default)]
struct MethodTable {
    statics: Vec<StaticRouter>,
    by_path: HashMap<String, usize>,
    dynamic: Chain,
    patterns: Vec<Arc<Pattern>>,
}

impl MethodTable {
    fn insert(&mut self, method: &Method, pattern: Arc<Pattern>, handler: SharedHandler) -> Result<()> {
        if pattern.is_static() {
            if self.by_path.contains_key(pattern.as_str()) {
                return Err(RouterError::DuplicateRoute {
                    method: method.to_string(),
                    path: pattern.as_str().to_string(),
                });
            }
            self.by_path
                .insert(pattern.as_str().to_string(), self.statics.len());
            self.statics
                .push(StaticRouter::new(pattern.clone(), handler));
        } else {
            self.dynamic.push(route_pattern(pattern.clone(), handler));
        }
        self.patterns.push(pattern);
        Ok(())
    }

    fn route(&self, req: &mut Request) -> Option<SharedHandler> {
        let fixed = match req.comparison() {
            PathMatch::Exact => self
                .by_path
                .get(req.path())
                .and_then(|&i| self.statics[i].route(req)),
            PathMatch::CaseInsensitive => self.statics.iter().find_map(|r| r.route(req)),
        };
        fixed.or_else(|| self.dynamic.route(req))
    }
}

/// A full featured request router.
///
/// Routes are registered per method. When a request does not match a route
/// of its method, the mux tries, in order:
///
/// 1. a permanent redirect to the path with the trailing slash toggled, to
///    the cleaned path, or to a route matching case-insensitively
/// 2. an automatic reply to `OPTIONS` listing the allowed methods
/// 3. the method-not-allowed handler, when one is set and another method
///    matches the path
/// 4. the not-found handler
///
/// # Example
///
/// ```ignore
/// use oxide_mux::Mux;
/// use oxide_route::{Request, Response};
///
/// fn index(_req: &mut Request, res: &mut Response) {
///     *res = Response::text("Welcome!");
/// }
///
/// fn hello(req: &mut Request, res: &mut Response) {
///     *res = Response::text(format!("hello, {}!", req.params().by_name("name")));
/// }
///
/// let mut mux = Mux::new();
/// mux.get("/", index)?.get("/hello/:name", hello)?;
/// ```
pub struct Mux {
    config: MuxConfig,
    tables: BTreeMap<Method, MethodTable>,
    method_not_allowed: Option<SharedHandler>,
    not_found: Option<SharedHandler>,
}

impl fmt::Debug for Mux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mux")
            .field("config", &self.config)
            .field("methods", &self.tables.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Default for Mux {
    fn default() -> Self {
        Self::new()
    }
}

impl Mux {
    /// Creates a mux with every fallback enabled.
    pub fn new() -> Self {
        Self::with_config(MuxConfig::default())
    }

    /// Creates a mux with the given configuration.
    pub fn with_config(config: MuxConfig) -> Self {
        Self {
            config,
            tables: BTreeMap::new(),
            method_not_allowed: None,
            not_found: None,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MuxConfig {
        &self.config
    }

    /// Registers a handler for a method and path.
    ///
    /// The path is compiled immediately; an invalid pattern or a static path
    /// registered twice for the same method fails the registration.
    pub fn handle(
        &mut self,
        method: Method,
        path: &str,
        handler: impl Handler + 'static,
    ) -> Result<&mut Self> {
        self.register(method, path, Arc::new(handler))?;
        Ok(self)
    }

    /// Registers a handler and records its pattern under `name`.
    pub fn handle_named(
        &mut self,
        registry: &mut RouteRegistry,
        name: &str,
        method: Method,
        path: &str,
        handler: impl Handler + 'static,
    ) -> Result<&mut Self> {
        if registry.pattern(name).is_some() {
            return Err(RouterError::DuplicateRouteName(name.to_string()));
        }
        let pattern = self.register(method, path, Arc::new(handler))?;
        registry.insert(name, pattern)?;
        Ok(self)
    }

    /// Registers a GET route.
    pub fn get(&mut self, path: &str, handler: impl Handler + 'static) -> Result<&mut Self> {
        self.handle(Method::Get, path, handler)
    }

    /// Registers a HEAD route.
    pub fn head(&mut self, path: &str, handler: impl Handler + 'static) -> Result<&mut Self> {
        self.handle(Method::Head, path, handler)
    }

    /// Registers a POST route.
    pub fn post(&mut self, path: &str, handler: impl Handler + 'static) -> Result<&mut Self> {
        self.handle(Method::Post, path, handler)
    }

    /// Registers a PUT route.
    pub fn put(&mut self, path: &str, handler: impl Handler + 'static) -> Result<&mut Self> {
        self.handle(Method::Put, path, handler)
    }

    /// Registers a PATCH route.
    pub fn patch(&mut self, path: &str, handler: impl Handler + 'static) -> Result<&mut Self> {
        self.handle(Method::Patch, path, handler)
    }

    /// Registers a DELETE route.
    pub fn delete(&mut self, path: &str, handler: impl Handler + 'static) -> Result<&mut Self> {
        self.handle(Method::Delete, path, handler)
    }

    /// Registers an OPTIONS route.
    pub fn options(&mut self, path: &str, handler: impl Handler + 'static) -> Result<&mut Self> {
        self.handle(Method::Options, path, handler)
    }

    /// Serves files below a catch-all path.
    ///
    /// The request path is replaced with the catch-all value before `server`
    /// is called, so `/static/*file` hands `/css/site.css` to `server` for
    /// `/static/css/site.css`.
    pub fn files(&mut self, path: &str, server: impl Handler + 'static) -> Result<&mut Self> {
        let pattern = Pattern::parse(path)?;
        let Some(Segment::CatchAll(key)) = pattern.segments().last().cloned() else {
            return Err(RouterError::InvalidPattern {
                pattern: pattern.as_str().to_string(),
                reason: "file route requires a catch-all",
            });
        };

        let handler = move |req: &mut Request, res: &mut Response| {
            let file = req.params().by_name(&key).to_string();
            req.set_path(file);
            server.serve(req, res);
        };
        self.handle(Method::Get, path, handler)
    }

    /// Sets the handler for requests whose path only matches other methods.
    ///
    /// The `Allow` header is set on the response after the handler ran.
    pub fn method_not_allowed(&mut self, handler: impl Handler + 'static) -> &mut Self {
        self.method_not_allowed = Some(Arc::new(handler));
        self
    }

    /// Sets the handler for requests nothing else could serve.
    pub fn not_found(&mut self, handler: impl Handler + 'static) -> &mut Self {
        self.not_found = Some(Arc::new(handler));
        self
    }

    /// Returns the methods that have routes.
    pub fn methods(&self) -> impl Iterator<Item = &Method> + '_ {
        self.tables.keys()
    }

    /// Returns the patterns registered for `method`, in registration order.
    pub fn patterns(&self, method: &Method) -> impl Iterator<Item = &Arc<Pattern>> + '_ {
        self.tables
            .get(method)
            .into_iter()
            .flat_map(|table| table.patterns.iter())
    }

    fn register(&mut self, method: Method, path: &str, handler: SharedHandler) -> Result<Arc<Pattern>> {
        let pattern = Arc::new(Pattern::parse(path)?);
        self.tables
            .entry(method.clone())
            .or_default()
            .insert(&method, pattern.clone(), handler)?;
        debug!(%method, pattern = pattern.as_str(), "registered route");
        Ok(pattern)
    }

    fn redirect(&self, table: &MethodTable, req: &Request) -> Option<SharedHandler> {
        let MuxConfig {
            redirect_trailing_slash,
            redirect_fixed_path,
            ..
        } = self.config;

        let mut candidates = Vec::new();
        if redirect_trailing_slash && req.path() != "/" {
            candidates.push((toggle_trailing_slash(req.path()), PathMatch::Exact));
        }
        if redirect_fixed_path {
            let cleaned = clean_path(req.path());
            if cleaned != req.path() {
                candidates.push((cleaned.clone(), PathMatch::Exact));
            }
            let toggled =
                (redirect_trailing_slash && cleaned != "/").then(|| toggle_trailing_slash(&cleaned));
            candidates.push((cleaned, PathMatch::CaseInsensitive));
            if let Some(toggled) = toggled {
                candidates.push((toggled, PathMatch::CaseInsensitive));
            }
        }

        for (path, comparison) in candidates {
            let mut probe = req.probe(path).compare_with(comparison);
            if table.route(&mut probe).is_none() {
                continue;
            }
            let Some(location) = canonical_path(&probe) else {
                continue;
            };
            probe.recycle();
            if location == req.path() {
                continue;
            }

            debug!(from = req.path(), to = %location, "redirecting");
            return Some(Arc::new(Redirect(location)));
        }
        None
    }

    fn auto_options(&self, req: &mut Request) -> Option<SharedHandler> {
        if req.method != Method::Options || !self.config.auto_options {
            return None;
        }

        let allow = allow_header(&self.allowed(req))?;
        debug!(path = req.path(), %allow, "answering OPTIONS");
        Some(Arc::new(move |_: &mut Request, res: &mut Response| {
            *res = Response::ok().header("Allow", allow.clone());
        }))
    }

    fn not_allowed(&self, req: &mut Request) -> Option<SharedHandler> {
        let handler = self.method_not_allowed.clone()?;
        let allow = allow_header(&self.allowed(req))?;
        debug!(method = %req.method, path = req.path(), %allow, "method not allowed");
        Some(Arc::new(move |req: &mut Request, res: &mut Response| {
            handler.serve(req, res);
            res.set_header("Allow", allow.clone());
        }))
    }

    /// Collects the other methods with a route for the request path, plus
    /// OPTIONS. The path `*` allows every registered method.
    fn allowed(&self, req: &mut Request) -> BTreeSet<Method> {
        let mut allow = BTreeSet::new();
        for (method, table) in &self.tables {
            if *method == req.method {
                continue;
            }
            if req.path() == "*" || table.route(req).is_some() {
                allow.insert(method.clone());
            }
            req.recycle();
        }
        if !allow.is_empty() {
            allow.insert(Method::Options);
        }
        allow
    }
}

impl Router for Mux {
    fn route(&self, req: &mut Request) -> Option<SharedHandler> {
        let table = self.tables.get(&req.method);

        if let Some(handler) = table.and_then(|t| t.route(req)) {
            return Some(handler);
        }
        if let Some(handler) = table.and_then(|t| self.redirect(t, req)) {
            return Some(handler);
        }
        if let Some(handler) = self.auto_options(req) {
            return Some(handler);
        }
        if let Some(handler) = self.not_allowed(req) {
            return Some(handler);
        }

        debug!(method = %req.method, path = req.path(), "no route");
        None
    }
}

impl Handler for Mux {
    fn serve(&self, req: &mut Request, res: &mut Response) {
        serve_routed(self, self.not_found.as_deref(), req, res);
    }
}

/// Rebuilds the path of the matched route from its pattern, so literal
/// segments take the registered spelling and parameters the matched one.
fn canonical_path(req: &Request) -> Option<String> {
    let matched = req.route_match()?;
    Some(matched.pattern().expand(req.params().values()))
}

fn allow_header(methods: &BTreeSet<Method>) -> Option<String> {
    if methods.is_empty() {
        return None;
    }
    Some(
        methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Redirects to a canonical path, keeping the request's query string.
struct Redirect(String);

impl Handler for Redirect {
    fn serve(&self, req: &mut Request, res: &mut Response) {
        let location = match req.raw_query() {
            "" => self.0.clone(),
            query => format!("{}?{query}", self.0),
        };
        *res = Response::redirect_permanent(location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut Request, _: &mut Response) {}

    #[test]
    fn test_static_routes_take_precedence() {
        let mut mux = Mux::new();
        mux.get("/user/:id", |_: &mut Request, res: &mut Response| {
            *res = Response::text("dynamic");
        })
        .unwrap()
        .get("/user/new", |_: &mut Request, res: &mut Response| {
            *res = Response::text("static");
        })
        .unwrap();

        let mut req = Request::get("/user/new");
        let mut res = Response::default();
        mux.serve(&mut req, &mut res);
        assert_eq!(res.body_string().unwrap(), "static");
    }

    #[test]
    fn test_duplicate_static_route() {
        let mut mux = Mux::new();
        mux.get("/a", noop).unwrap();
        assert!(matches!(
            mux.get("/a", noop),
            Err(RouterError::DuplicateRoute { .. })
        ));
        // other methods are separate tables
        assert!(mux.post("/a", noop).is_ok());
    }

    #[test]
    fn test_invalid_pattern_fails_registration() {
        let mut mux = Mux::new();
        assert!(matches!(
            mux.get("/users/:id:x", noop),
            Err(RouterError::InvalidPattern { .. })
        ));
        assert_eq!(mux.methods().count(), 0);
    }

    #[test]
    fn test_files_requires_catch_all() {
        let mut mux = Mux::new();
        assert!(matches!(
            mux.files("/static/:file", noop),
            Err(RouterError::InvalidPattern { reason, .. }) if reason == "file route requires a catch-all"
        ));
    }

    #[test]
    fn test_patterns_in_registration_order() {
        let mut mux = Mux::new();
        mux.get("/b/:id", noop)
            .unwrap()
            .get("/a", noop)
            .unwrap()
            .post("/c", noop)
            .unwrap();

        let patterns: Vec<&str> = mux.patterns(&Method::Get).map(|p| p.as_str()).collect();
        assert_eq!(patterns, vec!["/b/:id", "/a"]);
        assert_eq!(mux.methods().collect::<Vec<_>>(), vec![&Method::Get, &Method::Post]);
        assert_eq!(mux.patterns(&Method::Delete).count(), 0);
    }

    #[test]
    fn test_canonical_path_substitutes_values() {
        let pattern = Arc::new(Pattern::parse("/Users/:id/Files/*rest").unwrap());
        let router = route_pattern(pattern, Arc::new(noop));
        let mut req = Request::get("/users/Bob/files/a/B").compare_with(PathMatch::CaseInsensitive);
        assert!(router.route(&mut req).is_some());
        assert_eq!(canonical_path(&req).unwrap(), "/Users/Bob/Files/a/B");
    }

    #[test]
    fn test_redirect_keeps_query() {
        let mut res = Response::default();
        let mut req = Request::from_target(Method::Get, "/a/b?page=2&q=x+y");
        Redirect("/a/b/".to_string()).serve(&mut req, &mut res);
        assert_eq!(res.status, 308);
        assert_eq!(res.get_header("Location"), Some("/a/b/?page=2&q=x+y"));
    }

    #[test]
    fn test_allow_header() {
        let methods: BTreeSet<Method> = [Method::Options, Method::Post, Method::Get].into();
        assert_eq!(allow_header(&methods).unwrap(), "GET, POST, OPTIONS");
        assert_eq!(allow_header(&BTreeSet::new()), None);
    }
}
