use std::sync::Arc;
use xypriss::radix::RadixError;
use xypriss::{BoxHandler, FnHandler, HttpMethod, ParamValue, Router, RouterError};

fn noop_handler() -> BoxHandler {
    Arc::new(FnHandler(|_req, _res, _ctx| async {}))
}

#[test]
fn router_when_parameter_segment_has_no_name_then_registration_fails() {
    let router = Router::new();
    let err = router
        .get("/:", noop_handler())
        .expect_err("a bare colon with no name should be rejected");
    assert!(matches!(err, RouterError::Radix(RadixError::Pattern(_))));
}

#[test]
fn router_when_kind_bracket_is_unterminated_then_registration_fails() {
    let router = Router::new();
    let err = router
        .get("/:id<id", noop_handler())
        .expect_err("an unterminated kind bracket should be rejected");
    assert!(matches!(err, RouterError::Radix(RadixError::Pattern(_))));
}

#[test]
fn router_when_root_level_wildcard_registered_then_matches_any_non_empty_suffix() {
    let router = Router::new();
    router
        .get("/*", noop_handler())
        .expect("root-level wildcard should register");

    let matched = router
        .resolve(HttpMethod::Get, "/anything/goes/here")
        .expect("wildcard should match an arbitrary suffix");
    assert_eq!(
        matched.param("*"),
        Some(&ParamValue::Str("anything/goes/here".to_string()))
    );
}

#[test]
fn router_when_root_level_wildcard_registered_then_root_path_itself_does_not_match() {
    let router = Router::new();
    router
        .get("/*", noop_handler())
        .expect("root-level wildcard should register");

    let err = router
        .resolve(HttpMethod::Get, "/")
        .expect_err("the wildcard requires at least one segment to capture");
    assert!(matches!(err, RouterError::Miss { .. }));
}

#[test]
fn router_when_multi_segment_path_registered_then_resolves_segment_by_segment() {
    let router = Router::new();
    router
        .get("/a/b/c", noop_handler())
        .expect("nested literal path should register");

    router
        .resolve(HttpMethod::Get, "/a/b/c")
        .expect("nested literal path should resolve");

    let err = router
        .resolve(HttpMethod::Get, "/a/b")
        .expect_err("a partial prefix should not match a deeper route");
    assert!(matches!(err, RouterError::Miss { .. }));
}
