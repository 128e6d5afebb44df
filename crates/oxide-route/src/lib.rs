//! # oxide-route
//!
//! Composable HTTP request routing with pooled path parameters.
//!
//! This crate provides:
//! - Path patterns with named (`:name`) and catch-all (`*name`) parameters
//! - A segment matcher that binds parameters without allocating per request
//! - Routers that compose: static, dynamic, ordered chains and plain functions
//! - Named routes for reverse URL lookup
//!
//! Method dispatch, redirects and `OPTIONS` handling live in `oxide-mux`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use oxide_route::{route, Chain, Request, Response};
//!
//! fn index(_req: &mut Request, res: &mut Response) {
//!     *res = Response::text("Welcome!");
//! }
//!
//! fn hello(req: &mut Request, res: &mut Response) {
//!     *res = Response::text(format!("hello, {}!", req.params().by_name("name")));
//! }
//!
//! let router = Chain::new([route("/", index)?, route("/hello/:name", hello)?]);
//!
//! let mut req = Request::get("/hello/gopher");
//! let mut res = Response::default();
//! router.serve(&mut req, &mut res);
//! ```
//!
//! ## Path Parameters
//!
//! Named parameters match anything up to the next `/` or the end of the
//! path:
//!
//! ```text
//! Pattern: /blog/:category/:post
//!
//!  /blog/go/request-routers            match: category="go", post="request-routers"
//!  /blog/go/request-routers/           no match
//!  /blog/go/                           no match
//!  /blog/go/request-routers/comments   no match
//! ```
//!
//! Catch-all parameters match the rest of the path, including the `/`
//! before it, and must end the pattern:
//!
//! ```text
//! Pattern: /files/*filepath
//!
//!  /files/                             match: filepath="/"
//!  /files/LICENSE                      match: filepath="/LICENSE"
//!  /files/templates/article.html       match: filepath="/templates/article.html"
//!  /files                              no match
//! ```
//!
//! ## Parameter Lifetime
//!
//! A matched dynamic route attaches a pooled parameter buffer to the
//! request. The handler returned by [`Router::route`] gives it back after
//! serving. When a request is only tested and not served, release it with
//! [`Request::recycle`]:
//!
//! ```ignore
//! if router.route(&mut req).is_some() {
//!     println!("{:?}", req.params().iter().collect::<Vec<_>>());
//!     req.recycle();
//! }
//! ```

mod error;
mod hits;
mod matcher;
mod params;
mod pattern;
mod registry;
mod request;
mod response;
mod router;

pub use error::{Result, RouterError};
pub use hits::HitCountingChain;
pub use matcher::{PathMatch, path_eq};
pub use params::{ParamPool, Params, RouteMatch};
pub use pattern::{Pattern, Segment};
pub use registry::RouteRegistry;
pub use request::{Method, Request};
pub use response::Response;
pub use router::{
    Chain, DynamicRouter, Handler, Router, RouterFn, SharedHandler, StaticRouter, handles, route,
    route_case_insensitive, route_pattern, router_fn, serve_routed,
};
