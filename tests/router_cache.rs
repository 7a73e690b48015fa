use std::sync::Arc;
use xypriss::{BoxHandler, FnHandler, HttpMethod, Router};

fn noop_handler() -> BoxHandler {
    Arc::new(FnHandler(|_req, _res, _ctx| async {}))
}

#[test]
fn router_when_same_key_resolved_repeatedly_then_predictive_cache_admits_after_threshold() {
    let router = Router::new();
    router
        .get("/users/:id", noop_handler())
        .expect("route should register");

    for _ in 0..3 {
        router
            .resolve(HttpMethod::Get, "/users/1")
            .expect("lookup should succeed");
    }
    let mid = router.stats();
    assert_eq!(mid.cache_hits, 0);
    assert_eq!(mid.cache_misses, 3);

    router
        .resolve(HttpMethod::Get, "/users/1")
        .expect("fourth lookup should be served from the predictive cache");
    let after = router.stats();
    assert_eq!(after.cache_hits, 1);
    assert_eq!(after.cache_misses, 3);
}

#[test]
fn router_when_distinct_keys_resolved_then_admission_counters_are_independent() {
    let router = Router::new();
    router
        .get("/users/:id", noop_handler())
        .expect("route should register");

    router
        .resolve(HttpMethod::Get, "/users/1")
        .expect("lookup should succeed");
    router
        .resolve(HttpMethod::Get, "/users/2")
        .expect("lookup should succeed");

    let stats = router.stats();
    assert_eq!(stats.cache_hits, 0);
    assert_eq!(stats.cache_misses, 2);
}

#[test]
fn router_when_route_removed_then_predictive_cache_is_cleared() {
    let router = Router::new();
    router
        .get("/users/:id", noop_handler())
        .expect("route should register");
    for _ in 0..3 {
        router
            .resolve(HttpMethod::Get, "/users/1")
            .expect("lookup should succeed");
    }
    router
        .resolve(HttpMethod::Get, "/users/1")
        .expect("lookup should be served from the predictive cache");

    router
        .get("/other", noop_handler())
        .expect("registering another route should succeed and invalidate the cache");

    let stats_before = router.stats();
    router
        .resolve(HttpMethod::Get, "/users/1")
        .expect("lookup should succeed after cache invalidation");
    let stats_after = router.stats();
    assert_eq!(stats_after.cache_misses, stats_before.cache_misses + 1);
}
