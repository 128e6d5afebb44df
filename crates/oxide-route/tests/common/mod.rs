#![allow(dead_code)]

use std::sync::Arc;

use oxide_route::{Handler, Request, Response, Router, route};

/// Handler writing a fixed body.
pub fn body(text: &'static str) -> impl Handler {
    move |_: &mut Request, res: &mut Response| *res = Response::text(text)
}

/// Handler echoing the matched pattern and parameters.
pub fn echo(req: &mut Request, res: &mut Response) {
    let params: Vec<String> = req
        .params()
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    *res = Response::text(format!(
        "{} {}",
        req.pattern().unwrap_or_default(),
        params.join("&")
    ));
}

pub fn echo_route(path: &str) -> Arc<dyn Router> {
    route(path, echo).unwrap_or_else(|e| panic!("Failed to compile: {path}\nError: {e}"))
}

pub fn serve(router: &dyn Router, path: &str) -> Response {
    let mut req = Request::get(path);
    let mut res = Response::default();
    router.serve(&mut req, &mut res);
    res
}
