//! Tests for chains of static and dynamic routes.

mod common;
use common::*;

use std::sync::Arc;

use oxide_route::{Chain, Handler, Request, Response, Router};

fn table() -> Chain {
    Chain::new([
        echo_route("/a/:b/c"),
        echo_route("/category/:cid/product/*rest"),
        echo_route("/users/:id/:bid/"),
        echo_route("/applications/:client_id/tokens"),
        echo_route("/repos/:owner/:repo/issues/:number/labels/:name"),
        echo_route("/files/*filepath"),
        echo_route("/hello/:name"),
        echo_route("/search/:query"),
        echo_route("/search/"),
        echo_route("/ünìcodé.html"),
    ])
}

#[test]
fn matches_expected_patterns() {
    let router = table();
    let cases = [
        ("/hello/john", Some(("/hello/:name", "name=john"))),
        ("/hellowe", None),
        ("/a/dic/c", Some(("/a/:b/c", "b=dic"))),
        ("/a/d/c", Some(("/a/:b/c", "b=d"))),
        ("/a/c", None),
        ("/a/c/c", Some(("/a/:b/c", "b=c"))),
        ("/a/c/b", None),
        ("/a/c/c/", None),
        (
            "/category/5/product/x/a/bc",
            Some(("/category/:cid/product/*rest", "cid=5&rest=/x/a/bc")),
        ),
        ("/users/a/b/", Some(("/users/:id/:bid/", "id=a&bid=b"))),
        ("/users/a/b/be/", None),
        (
            "/applications/:client_id/tokens",
            Some(("/applications/:client_id/tokens", "client_id=:client_id")),
        ),
        ("/repos/:owner/:repo/issues/:number/labels", None),
        ("/files/LICENSE", Some(("/files/*filepath", "filepath=/LICENSE"))),
        ("/files/", Some(("/files/*filepath", "filepath=/"))),
        ("/files", None),
        (
            "/files/css/style.css",
            Some(("/files/*filepath", "filepath=/css/style.css")),
        ),
        ("/search/", Some(("/search/", ""))),
        ("/search", None),
        (
            "/search/someth!ng+in+ünìcodé",
            Some(("/search/:query", "query=someth!ng+in+ünìcodé")),
        ),
        ("/search/someth!ng+in+ünìcodé/", None),
        ("/ünìcodé.html", Some(("/ünìcodé.html", ""))),
    ];

    for (path, expected) in cases {
        let mut req = Request::get(path);
        let handler = router.route(&mut req);

        let Some((pattern, params)) = expected else {
            assert!(handler.is_none(), "did not expect to match: {path}");
            assert!(req.pattern().is_none());
            continue;
        };

        let handler = handler.unwrap_or_else(|| panic!("expected to match: {path}"));
        assert_eq!(req.pattern(), Some(pattern), "{path}");

        let mut res = Response::default();
        handler.serve(&mut req, &mut res);
        assert_eq!(res.status, 200);
        assert_eq!(res.body_string().unwrap(), format!("{pattern} {params}"));
        assert!(req.params().is_empty(), "parameters should have been flushed");
        assert!(req.pattern().is_none());
    }
}

#[test]
fn static_routes_match_whole_path() {
    let router = Chain::new([
        echo_route("/users/hello/bin/"),
        echo_route("/"),
        echo_route("/users/hello"),
    ]);

    for (path, matched) in [
        ("/users/hello", true),
        ("/user/hello", false),
        ("/users/hello/", false),
        ("/users/hello/bin", false),
        ("/users/hello/bin/", true),
        ("/", true),
    ] {
        let mut req = Request::get(path);
        assert_eq!(router.route(&mut req).is_some(), matched, "{path}");
        if matched {
            assert_eq!(req.pattern(), Some(path));
        }
        assert!(req.params().is_empty());
        req.recycle();
    }
}

#[test]
fn registration_order_decides_overlaps() {
    let router = Chain::new([echo_route("/user/new"), echo_route("/user/:id")]);
    let res = serve(&router, "/user/new");
    assert_eq!(res.body_string().unwrap(), "/user/new ");

    let reversed = Chain::new([echo_route("/user/:id"), echo_route("/user/new")]);
    let res = serve(&reversed, "/user/new");
    assert_eq!(res.body_string().unwrap(), "/user/:id id=new");
}

#[test]
fn chains_nest() {
    let api = Chain::new([echo_route("/api/users/:id"), echo_route("/api/health")]);
    let app = Chain::new([
        Arc::new(api) as Arc<dyn Router>,
        echo_route("/*page"),
    ]);

    assert_eq!(
        serve(&app, "/api/users/3").body_string().unwrap(),
        "/api/users/:id id=3"
    );
    assert_eq!(
        serve(&app, "/about/team").body_string().unwrap(),
        "/*page page=/about/team"
    );
}

#[test]
fn generated_routes() {
    let mut chain = Chain::default();
    let mut last = String::new();
    for i in 0..60 {
        let path = format!("/{}/{}/{}/:id", i % 7, i % 11, i);
        chain.push(echo_route(&path));
        last = path;
    }
    assert_eq!(chain.len(), 60);

    let res = serve(&chain, &last.replace(":id", "param"));
    assert_eq!(res.status, 200);
    assert_eq!(res.body_string().unwrap(), format!("{last} id=param"));
}
