use std::sync::Arc;
use xypriss::radix::RadixError;
use xypriss::{BoxHandler, FnHandler, HttpMethod, Router, RouterError, RouteSpec};

fn noop_handler() -> BoxHandler {
    Arc::new(FnHandler(|_req, _res, _ctx| async {}))
}

#[test]
fn router_when_bulk_routes_registered_then_returns_one_key_per_entry_and_all_resolve() {
    let router = Router::new();
    let keys = router
        .register_bulk(vec![
            RouteSpec::new(HttpMethod::Get, "/bulk/one", noop_handler()),
            RouteSpec::new(HttpMethod::Get, "/bulk/two", noop_handler()),
            RouteSpec::new(HttpMethod::Post, "/bulk/post", noop_handler()),
        ])
        .expect("bulk registration should succeed");

    assert_eq!(keys.len(), 3);

    router
        .resolve(HttpMethod::Get, "/bulk/one")
        .expect("first bulk route should resolve");
    router
        .resolve(HttpMethod::Get, "/bulk/two")
        .expect("second bulk route should resolve");
    router
        .resolve(HttpMethod::Post, "/bulk/post")
        .expect("third bulk route should resolve");

    assert_eq!(router.stats().registered, 3);
}

#[test]
fn router_when_bulk_batch_includes_an_invalid_path_then_returns_error() {
    let router = Router::new();
    let err = router.register_bulk(vec![
        RouteSpec::new(HttpMethod::Get, "/valid", noop_handler()),
        RouteSpec::new(HttpMethod::Get, "/\tinvalid", noop_handler()),
    ]);

    let err = err.expect_err("an invalid path partway through the batch should fail the call");
    assert!(matches!(err, RouterError::Radix(RadixError::Path(_))));
}

#[test]
fn router_when_bulk_batch_fails_then_earlier_entries_remain_registered() {
    let router = Router::new();
    router
        .register_bulk(vec![
            RouteSpec::new(HttpMethod::Get, "/partial/ok", noop_handler()),
            RouteSpec::new(HttpMethod::Get, "/\tinvalid", noop_handler()),
        ])
        .expect_err("the batch as a whole should fail");

    router
        .resolve(HttpMethod::Get, "/partial/ok")
        .expect("entries inserted before the failing one stay in the tree");
}

#[test]
fn router_when_bulk_batch_with_priority_and_metadata_then_values_are_preserved() {
    let router = Router::new();
    let metadata = serde_json::json!({ "owner": "billing" });
    router
        .register_bulk(vec![
            RouteSpec::new(HttpMethod::Get, "/priced", noop_handler())
                .with_priority(5)
                .with_metadata(metadata.clone()),
        ])
        .expect("bulk registration should succeed");

    let route = router
        .list()
        .into_iter()
        .find(|r| r.path == "/priced")
        .expect("registered route should be listed");
    assert_eq!(route.priority, 5);
    assert_eq!(route.metadata, metadata);
}
