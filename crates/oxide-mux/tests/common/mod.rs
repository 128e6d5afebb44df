#![allow(dead_code)]

use oxide_mux::Mux;
use oxide_route::{Handler, Method, Request, Response};

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

pub fn not_allowed(_: &mut Request, res: &mut Response) {
    *res = Response::method_not_allowed();
}

pub fn serve(mux: &Mux, method: Method, path: &str) -> Response {
    let mut req = Request::new(method, path);
    let mut res = Response::default();
    mux.serve(&mut req, &mut res);
    res
}

pub fn get(mux: &Mux, path: &str) -> Response {
    serve(mux, Method::Get, path)
}

pub fn location(res: &Response) -> Option<&str> {
    res.get_header("Location")
}
