use std::sync::Arc;
use xypriss::radix::RadixError;
use xypriss::{BoxHandler, FnHandler, HttpMethod, Router, RouterError};

fn noop_handler() -> BoxHandler {
    Arc::new(FnHandler(|_req, _res, _ctx| async {}))
}

#[test]
fn router_supports_independent_methods_on_the_same_path() {
    let router = Router::new();
    let get_key = router
        .get("/status", noop_handler())
        .expect("GET route should register");
    let post_key = router
        .post("/status", noop_handler())
        .expect("POST route should register");

    assert_ne!(get_key, post_key);

    let found_get = router
        .resolve(HttpMethod::Get, "/status")
        .expect("GET /status should resolve");
    assert_eq!(found_get.route_key, get_key);

    let found_post = router
        .resolve(HttpMethod::Post, "/status")
        .expect("POST /status should resolve");
    assert_eq!(found_post.route_key, post_key);
}

#[test]
fn router_tracks_registration_and_resolve_stats_across_a_session() {
    let router = Router::new();
    router.get("/a", noop_handler()).expect("route should register");
    router.post("/b", noop_handler()).expect("route should register");
    router
        .get("/c/:id", noop_handler())
        .expect("route should register");

    let before = router.stats();
    assert_eq!(before.registered, 3);
    assert_eq!(before.static_routes, 2);
    assert_eq!(before.dynamic_routes, 1);
    assert_eq!(before.executions, 0);

    router.resolve(HttpMethod::Get, "/a").expect("route should resolve");
    router.resolve(HttpMethod::Post, "/b").expect("route should resolve");

    let after = router.stats();
    assert_eq!(after.executions, 2);
}

#[test]
fn router_validates_empty_and_invalid_paths() {
    let router = Router::new();

    let empty = router
        .get("", noop_handler())
        .expect_err("empty path should be rejected");
    assert!(matches!(empty, RouterError::Radix(RadixError::Path(_))));

    let leading_space = router
        .get(" /space", noop_handler())
        .expect_err("leading whitespace should be rejected");
    assert!(matches!(leading_space, RouterError::Radix(RadixError::Path(_))));

    let traversal = router
        .get("/a/../escape", noop_handler())
        .expect_err("parent traversal should be rejected");
    assert!(matches!(traversal, RouterError::Radix(RadixError::Path(_))));

    let non_ascii = router
        .get("/nonascii/\u{e5}", noop_handler())
        .expect_err("non-ASCII bytes should be rejected");
    assert!(matches!(non_ascii, RouterError::Radix(RadixError::Path(_))));

    let missing_slash = router
        .get("missing/slash", noop_handler())
        .expect_err("a path must start with '/'");
    assert!(matches!(missing_slash, RouterError::Radix(RadixError::Path(_))));
}

#[test]
fn router_list_reflects_every_registered_route() {
    let router = Router::new();
    router.get("/a", noop_handler()).expect("route should register");
    router.post("/b", noop_handler()).expect("route should register");
    router
        .delete("/c/:id<id>", noop_handler())
        .expect("route should register");

    let mut paths: Vec<_> = router.list().into_iter().map(|r| r.path).collect();
    paths.sort();
    assert_eq!(paths, vec!["/a", "/b", "/c/:id<id>"]);
}
