use std::sync::Arc;
use xypriss::radix::RadixError;
use xypriss::{BoxHandler, FnHandler, HttpMethod, ParamValue, Router, RouterError};

fn noop_handler() -> BoxHandler {
    Arc::new(FnHandler(|_req, _res, _ctx| async {}))
}

#[test]
fn router_when_wildcard_route_registered_then_captures_suffix_segment() {
    let router = Router::new();
    router
        .get("/files/*", noop_handler())
        .expect("wildcard route should register");

    let matched = router
        .resolve(HttpMethod::Get, "/files/media/images/logo.png")
        .expect("wildcard route should match");

    assert_eq!(matched.params.len(), 1);
    assert_eq!(
        matched.param("*"),
        Some(&ParamValue::Str("media/images/logo.png".to_string()))
    );
}

#[test]
fn router_when_wildcard_registered_alongside_literal_then_literal_wins() {
    let router = Router::new();
    let literal_key = router
        .get("/files/readme.txt", noop_handler())
        .expect("literal route should register");
    router
        .get("/files/*", noop_handler())
        .expect("wildcard route should register");

    let matched = router
        .resolve(HttpMethod::Get, "/files/readme.txt")
        .expect("the more specific literal route should win");
    assert_eq!(matched.route_key, literal_key);
    assert!(matched.params.is_empty());
}

#[test]
fn router_when_duplicate_wildcard_route_registered_then_returns_error() {
    let router = Router::new();
    router
        .get("/wild/*", noop_handler())
        .expect("first wildcard should register");

    let err = router
        .get("/wild/*", noop_handler())
        .expect_err("duplicate wildcard registration should fail");
    assert!(matches!(err, RouterError::Radix(RadixError::DuplicateRoute { .. })));
}

#[test]
fn router_when_wildcard_occurs_before_final_segment_then_returns_error() {
    let router = Router::new();
    let err = router
        .get("/files/*/meta", noop_handler())
        .expect_err("a non-terminal wildcard should be rejected");
    assert!(matches!(err, RouterError::Radix(RadixError::WildcardNotTerminal { .. })));
}
