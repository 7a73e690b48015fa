use std::sync::Arc;
use xypriss::radix::RadixError;
use xypriss::{BoxHandler, FnHandler, HttpMethod, Router, RouterError};

fn noop_handler() -> BoxHandler {
    Arc::new(FnHandler(|_req, _res, _ctx| async {}))
}

#[test]
fn router_when_route_removed_then_resolve_misses() {
    let router = Router::new();
    router
        .get("/temp", noop_handler())
        .expect("route should register");

    router
        .resolve(HttpMethod::Get, "/temp")
        .expect("route should resolve before removal");

    router.remove(HttpMethod::Get, "/temp").expect("route should remove");

    let err = router
        .resolve(HttpMethod::Get, "/temp")
        .expect_err("removed route should no longer resolve");
    assert!(matches!(err, RouterError::Miss { .. }));
}

#[test]
fn router_when_removing_unregistered_route_then_returns_error() {
    let router = Router::new();
    let err = router
        .remove(HttpMethod::Get, "/nowhere")
        .expect_err("removing an unregistered route should fail");
    assert!(matches!(err, RouterError::Radix(RadixError::RouteNotFound { .. })));
}

#[test]
fn router_when_route_removed_then_can_be_re_registered() {
    let router = Router::new();
    router
        .get("/slot", noop_handler())
        .expect("route should register");
    router.remove(HttpMethod::Get, "/slot").expect("route should remove");

    router
        .get("/slot", noop_handler())
        .expect("slot freed by removal should accept a new registration");
}

#[test]
fn router_when_route_registered_then_get_route_returns_compiled_route() {
    let router = Router::new();
    let key = router
        .get("/items/:id<id>", noop_handler())
        .expect("route should register");

    let matched = router
        .resolve(HttpMethod::Get, "/items/7")
        .expect("route should resolve");
    assert_eq!(matched.route_key, key);

    let compiled = router
        .list()
        .into_iter()
        .find(|r| r.path == "/items/:id<id>")
        .expect("registered route should be listed");
    assert_eq!(compiled.method, HttpMethod::Get);
    assert!(!compiled.is_static);
    assert_eq!(compiled.param_names().collect::<Vec<_>>(), vec!["id"]);
}

#[test]
fn router_when_routes_registered_then_visualize_renders_each_method_section() {
    let router = Router::new();
    router
        .get("/health", noop_handler())
        .expect("route should register");
    router
        .post("/users", noop_handler())
        .expect("route should register");

    let rendered = router.visualize();
    assert!(rendered.contains("GET"));
    assert!(rendered.contains("POST"));
}
