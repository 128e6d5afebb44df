//! Routers and their composition.

use std::sync::Arc;

use tracing::trace;

use crate::error::Result;
use crate::matcher::{self, PathMatch};
use crate::params::RouteMatch;
use crate::pattern::Pattern;
use crate::request::Request;
use crate::response::Response;

/// Something that writes a response for a request.
///
/// Implemented for every `Fn(&mut Request, &mut Response)` closure, and by
/// every router in this crate.
pub trait Handler: Send + Sync {
    /// Serves the request.
    fn serve(&self, req: &mut Request, res: &mut Response);
}

impl<F> Handler for F
where
    F: Fn(&mut Request, &mut Response) + Send + Sync,
{
    fn serve(&self, req: &mut Request, res: &mut Response) {
        self(req, res);
    }
}

/// A shared, type-erased handler.
pub type SharedHandler = Arc<dyn Handler>;

/// A request matcher that is also a handler.
///
/// `route` returns the handler for a request, or `None` when this router
/// cannot serve it. A router that binds parameters attaches them to the
/// request; the returned handler releases them once it has served. If the
/// handler is not going to be served, call [`Request::recycle`].
pub trait Router: Handler {
    /// Resolves a handler for the request.
    fn route(&self, req: &mut Request) -> Option<SharedHandler>;
}

/// Serves a request through `router`, falling back to `not_found`, or to a
/// plain 404 response, when nothing matches.
pub fn serve_routed<R>(
    router: &R,
    not_found: Option<&dyn Handler>,
    req: &mut Request,
    res: &mut Response,
) where
    R: Router + ?Sized,
{
    if let Some(handler) = router.route(req) {
        handler.serve(req, res);
        return;
    }

    match not_found {
        Some(handler) => handler.serve(req, res),
        None => *res = Response::not_found(),
    }
}

/// Tests whether `router` matches the request, recycling any match.
pub fn handles<R>(router: &R, req: &mut Request) -> bool
where
    R: Router + ?Sized,
{
    let matched = router.route(req).is_some();
    req.recycle();
    matched
}

/// Compiles `path` and returns a router matching it to `handler`.
///
/// Static paths are compared as a whole, paths with parameters go through
/// the segment matcher.
pub fn route(path: &str, handler: impl Handler + 'static) -> Result<Arc<dyn Router>> {
    let pattern = Arc::new(Pattern::parse(path)?);
    Ok(route_pattern(pattern, Arc::new(handler)))
}

/// Builds the router for an already compiled pattern.
pub fn route_pattern(pattern: Arc<Pattern>, handler: SharedHandler) -> Arc<dyn Router> {
    if pattern.is_static() {
        Arc::new(StaticRouter::new(pattern, handler))
    } else {
        Arc::new(DynamicRouter::new(pattern, handler))
    }
}

/// Matches one literal path.
pub struct StaticRouter {
    pattern: Arc<Pattern>,
    handler: SharedHandler,
}

impl StaticRouter {
    /// Creates a router for a static pattern.
    pub fn new(pattern: Arc<Pattern>, handler: SharedHandler) -> Self {
        Self {
            pattern,
            handler: Arc::new(Release(handler)),
        }
    }

    /// Returns the pattern.
    pub fn pattern(&self) -> &Arc<Pattern> {
        &self.pattern
    }
}

impl Router for StaticRouter {
    fn route(&self, req: &mut Request) -> Option<SharedHandler> {
        if !matcher::path_eq(self.pattern.as_str(), req.path(), req.comparison()) {
            return None;
        }
        req.attach(RouteMatch::fixed(self.pattern.clone()));
        Some(self.handler.clone())
    }
}

impl Handler for StaticRouter {
    fn serve(&self, req: &mut Request, res: &mut Response) {
        serve_routed(self, None, req, res);
    }
}

/// Matches a pattern with parameters, binding them to the request.
pub struct DynamicRouter {
    pattern: Arc<Pattern>,
    handler: SharedHandler,
}

impl DynamicRouter {
    /// Creates a router for a pattern with parameters.
    pub fn new(pattern: Arc<Pattern>, handler: SharedHandler) -> Self {
        Self {
            pattern,
            handler: Arc::new(Release(handler)),
        }
    }

    /// Returns the pattern.
    pub fn pattern(&self) -> &Arc<Pattern> {
        &self.pattern
    }
}

impl Router for DynamicRouter {
    fn route(&self, req: &mut Request) -> Option<SharedHandler> {
        let pool = self.pattern.pool();
        let mut binding = pool.acquire();

        if matcher::match_segments(&self.pattern, req.path(), req.comparison(), &mut binding) {
            trace!(pattern = self.pattern.as_str(), path = req.path(), "matched");
            req.attach(RouteMatch::new(self.pattern.clone(), binding));
            return Some(self.handler.clone());
        }

        pool.release(binding);
        None
    }
}

impl Handler for DynamicRouter {
    fn serve(&self, req: &mut Request, res: &mut Response) {
        serve_routed(self, None, req, res);
    }
}

/// Recycles the request once the wrapped handler has served it.
struct Release(SharedHandler);

impl Handler for Release {
    fn serve(&self, req: &mut Request, res: &mut Response) {
        self.0.serve(req, res);
        req.recycle();
    }
}

/// Ordered routers, the first one to match wins.
///
/// Lookup is a linear scan in registration order, so overlapping routes
/// such as `/user/new` and `/user/:id` are resolved by order alone.
#[derive(Default)]
pub struct Chain {
    routers: Vec<Arc<dyn Router>>,
    not_found: Option<SharedHandler>,
}

impl Chain {
    /// Creates a chain of the given routers.
    pub fn new(routers: impl IntoIterator<Item = Arc<dyn Router>>) -> Self {
        Self {
            routers: routers.into_iter().collect(),
            not_found: None,
        }
    }

    /// Appends a router.
    pub fn push(&mut self, router: Arc<dyn Router>) {
        self.routers.push(router);
    }

    /// Sets the handler used by `serve` when nothing matches.
    #[must_use]
    pub fn not_found(mut self, handler: impl Handler + 'static) -> Self {
        self.not_found = Some(Arc::new(handler));
        self
    }

    /// Returns the number of routers.
    pub fn len(&self) -> usize {
        self.routers.len()
    }

    /// Returns true when the chain holds no routers.
    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }
}

impl Router for Chain {
    fn route(&self, req: &mut Request) -> Option<SharedHandler> {
        self.routers.iter().find_map(|router| router.route(req))
    }
}

impl Handler for Chain {
    fn serve(&self, req: &mut Request, res: &mut Response) {
        serve_routed(self, self.not_found.as_deref(), req, res);
    }
}

/// Adapts a matching function into a router.
pub struct RouterFn<F>(F);

/// Creates a router from a matching function.
pub fn router_fn<F>(f: F) -> RouterFn<F>
where
    F: Fn(&mut Request) -> Option<SharedHandler> + Send + Sync,
{
    RouterFn(f)
}

impl<F> Router for RouterFn<F>
where
    F: Fn(&mut Request) -> Option<SharedHandler> + Send + Sync,
{
    fn route(&self, req: &mut Request) -> Option<SharedHandler> {
        (self.0)(req)
    }
}

impl<F> Handler for RouterFn<F>
where
    F: Fn(&mut Request) -> Option<SharedHandler> + Send + Sync,
{
    fn serve(&self, req: &mut Request, res: &mut Response) {
        serve_routed(self, None, req, res);
    }
}

/// Tries `router` with literal path text compared case-insensitively.
///
/// The request's comparison mode is restored afterwards; a match stays
/// attached.
pub fn route_case_insensitive<R>(router: &R, req: &mut Request) -> Option<SharedHandler>
where
    R: Router + ?Sized,
{
    let previous = req.comparison();
    req.set_comparison(PathMatch::CaseInsensitive);
    let found = router.route(req);
    req.set_comparison(previous);
    found
}
