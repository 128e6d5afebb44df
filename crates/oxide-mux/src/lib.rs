//! # oxide-mux
//!
//! A request multiplexer built from `oxide-route` routers.
//!
//! Routes are registered per HTTP method. Static paths are looked up before
//! paths with parameters, so `/user/new` wins over `/user/:id` regardless of
//! registration order. Requests that miss get the usual conveniences:
//!
//! - permanent redirects for a toggled trailing slash, a cleaned path, and
//!   paths matching only case-insensitively
//! - automatic `OPTIONS` replies with an `Allow` header
//! - optional `405 Method Not Allowed` handling
//! - a configurable not-found handler
//!
//! ## Example
//!
//! ```ignore
//! use oxide_mux::{Mux, MuxConfig};
//! use oxide_route::{Handler, Request, Response};
//!
//! let mut mux = Mux::with_config(MuxConfig::from_json(r#"{"auto_options": false}"#)?);
//! mux.get("/user/:id", |req: &mut Request, res: &mut Response| {
//!     *res = Response::text(format!("user {}", req.params().by_name("id")));
//! })?;
//! mux.method_not_allowed(|_: &mut Request, res: &mut Response| {
//!     *res = Response::method_not_allowed();
//! });
//!
//! let mut req = Request::get("/user/42/");
//! let mut res = Response::default();
//! mux.serve(&mut req, &mut res);
//! assert_eq!(res.get_header("Location"), Some("/user/42"));
//! ```

mod clean;
mod config;
mod mux;

pub use clean::clean_path;
pub use config::MuxConfig;
pub use mux::Mux;
