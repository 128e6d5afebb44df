//! Route table files.
//!
//! A table is a JSON document listing routes and the mux configuration:
//!
//! ```json
//! {
//!     "config": { "redirect_fixed_path": false },
//!     "method_not_allowed": true,
//!     "routes": [
//!         { "method": "GET", "path": "/users/:id", "name": "user" },
//!         { "method": "GET", "path": "/files/*path" }
//!     ]
//! }
//! ```
//!
//! Every route is served by a handler describing the match, so resolving a
//! request shows which pattern it reached and what it bound.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use oxide_mux::{Mux, MuxConfig};
use oxide_route::{Handler, Method, Request, Response, RouteRegistry};

/// A route table as read from disk.
#[derive(Debug, Deserialize)]
pub struct RouteTable {
    /// Mux fallbacks.
    #[serde(default)]
    pub config: MuxConfig,
    /// Whether to answer 405 when another method matches.
    #[serde(default)]
    pub method_not_allowed: bool,
    /// Routes in registration order.
    pub routes: Vec<RouteEntry>,
}

/// One route of a table.
#[derive(Debug, Deserialize)]
pub struct RouteEntry {
    pub method: String,
    pub path: String,
    /// Name for reverse lookup.
    #[serde(default)]
    pub name: Option<String>,
}

impl RouteTable {
    /// Reads a table from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read route table {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Parses a table from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid route table")
    }

    /// Compiles the table into a mux and the registry of its named routes.
    pub fn build(&self) -> Result<(Mux, RouteRegistry)> {
        let mut mux = Mux::with_config(self.config);
        let mut registry = RouteRegistry::new();

        for entry in &self.routes {
            let method: Method = entry.method.parse()?;
            let registered = match &entry.name {
                Some(name) => {
                    mux.handle_named(&mut registry, name, method, &entry.path, describe_match)
                }
                None => mux.handle(method, &entry.path, describe_match),
            };
            registered.with_context(|| format!("route {} {}", entry.method, entry.path))?;
        }

        if self.method_not_allowed {
            mux.method_not_allowed(|_: &mut Request, res: &mut Response| {
                *res = Response::method_not_allowed();
            });
        }

        debug!(routes = self.routes.len(), "built route table");
        Ok((mux, registry))
    }
}

/// Writes the matched pattern and its parameters, one per line.
fn describe_match(req: &mut Request, res: &mut Response) {
    let mut body = format!("pattern: {}\n", req.pattern().unwrap_or_default());
    for (key, value) in req.params().iter() {
        let _ = writeln!(body, "  {key} = {value}");
    }
    *res = Response::text(body);
}

/// Serves one request through `mux` and renders the response.
pub fn resolve(mux: &Mux, method: &Method, target: &str) -> String {
    let mut req = Request::from_target(method.clone(), target);
    let mut res = Response::default();
    mux.serve(&mut req, &mut res);

    let mut out = format!("{method} {target} -> {} {}\n", res.status, res.status_text());
    for header in ["Location", "Allow"] {
        if let Some(value) = res.get_header(header) {
            let _ = writeln!(out, "{header}: {value}");
        }
    }
    if let Some(body) = res.body_string().filter(|b| !b.is_empty()) {
        out.push_str(&body);
        if !body.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

/// Lists the compiled routes, grouped by method.
pub fn list_routes(mux: &Mux) -> String {
    let mut out = String::new();
    for method in mux.methods() {
        for pattern in mux.patterns(method) {
            let _ = writeln!(out, "{:<7} {}", method.as_str(), pattern.as_str());
        }
    }
    out
}

/// Parses `key=value` arguments.
pub fn parse_params(args: &[String]) -> Result<Vec<(&str, &str)>> {
    args.iter()
        .map(|arg| {
            arg.split_once('=')
                .with_context(|| format!("expected KEY=VALUE, got {arg:?}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "method_not_allowed": true,
        "routes": [
            {"method": "GET", "path": "/users/:id", "name": "user"},
            {"method": "post", "path": "/users/:id"},
            {"method": "GET", "path": "/users/new"},
            {"method": "GET", "path": "/files/*path", "name": "files"}
        ]
    }"#;

    fn mux() -> (Mux, RouteRegistry) {
        RouteTable::from_json(TABLE).unwrap().build().unwrap()
    }

    #[test]
    fn test_resolve_match() {
        let (mux, _) = mux();
        assert_eq!(
            resolve(&mux, &Method::Get, "/users/42"),
            "GET /users/42 -> 200 OK\npattern: /users/:id\n  id = 42\n"
        );
        assert_eq!(
            resolve(&mux, &Method::Get, "/users/new?draft=1"),
            "GET /users/new?draft=1 -> 200 OK\npattern: /users/new\n"
        );
    }

    #[test]
    fn test_resolve_redirect() {
        let (mux, _) = mux();
        assert_eq!(
            resolve(&mux, &Method::Get, "/users/42/"),
            "GET /users/42/ -> 308 Permanent Redirect\nLocation: /users/42\n"
        );
        assert_eq!(
            resolve(&mux, &Method::Get, "/users/42/?tab=posts"),
            "GET /users/42/?tab=posts -> 308 Permanent Redirect\nLocation: /users/42?tab=posts\n"
        );
    }

    #[test]
    fn test_resolve_not_allowed() {
        let (mux, _) = mux();
        assert_eq!(
            resolve(&mux, &Method::Delete, "/users/42"),
            "DELETE /users/42 -> 405 Method Not Allowed\nAllow: GET, POST, OPTIONS\nMethod Not Allowed\n"
        );
    }

    #[test]
    fn test_list_routes() {
        let (mux, _) = mux();
        assert_eq!(
            list_routes(&mux),
            "GET     /users/:id\nGET     /users/new\nGET     /files/*path\nPOST    /users/:id\n"
        );
    }

    #[test]
    fn test_named_routes() {
        let (_, registry) = mux();
        let args = vec!["path=/css/site.css".to_string()];
        assert_eq!(
            registry.url_for("files", &parse_params(&args).unwrap()).unwrap(),
            "/files/css/site.css"
        );
    }

    #[test]
    fn test_parse_params_rejects_bare_words() {
        assert!(parse_params(&["id".to_string()]).is_err());
    }

    #[test]
    fn test_invalid_route_names_entry() {
        let table = RouteTable::from_json(
            r#"{"routes": [{"method": "GET", "path": "/a/*rest/b"}]}"#,
        )
        .unwrap();
        let err = table.build().unwrap_err();
        assert!(format!("{err:#}").contains("route GET /a/*rest/b"));
    }

    #[test]
    fn test_extension_method() {
        let table =
            RouteTable::from_json(r#"{"routes": [{"method": "brew", "path": "/pot/:kind"}]}"#)
                .unwrap();
        let (mux, _) = table.build().unwrap();
        let brew: Method = "BREW".parse().unwrap();
        assert_eq!(
            resolve(&mux, &brew, "/pot/tea"),
            "BREW /pot/tea -> 200 OK\npattern: /pot/:kind\n  kind = tea\n"
        );
        assert_eq!(list_routes(&mux), "BREW    /pot/:kind\n");
    }

    #[test]
    fn test_invalid_method() {
        let table =
            RouteTable::from_json(r#"{"routes": [{"method": "GE T", "path": "/"}]}"#).unwrap();
        assert!(table.build().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.json");
        std::fs::write(&path, TABLE).unwrap();

        let table = RouteTable::load(&path).unwrap();
        assert_eq!(table.routes.len(), 4);
        assert!(table.config.auto_options);
        assert!(RouteTable::load(&dir.path().join("missing.json")).is_err());
    }
}
