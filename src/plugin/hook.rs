use crate::middleware::{Context, Request, Response};
use async_trait::async_trait;
use std::time::Duration;

/// Arguments passed to `on_rate_limit`: the limiter's view of the request
/// that tripped it.
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    pub key: String,
    pub limit: u64,
    pub remaining: u64,
}

/// A lifecycle hook participant. Every method has a no-op default so a
/// plugin only implements the hooks it cares about.
#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    fn version(&self) -> &str {
        "0.1.0"
    }

    /// Execution order among registered plugins: ascending, lower first.
    fn priority(&self) -> i32 {
        0
    }

    async fn on_server_start(&self) {}

    async fn on_server_stop(&self) {}

    /// Returning `Some` short-circuits the middleware pipeline with that
    /// response; returning `None` continues to the next plugin/handler.
    async fn on_request(&self, _req: &mut Request, _ctx: &mut Context) -> Option<Response> {
        None
    }

    async fn on_response(&self, _res: &mut Response, _ctx: &Context, _timing: Duration) {}

    async fn on_rate_limit(&self, _info: &RateLimitInfo, _req: &Request, _res: &mut Response) {}

    async fn on_response_time(&self, _ms: u64, _req: &Request, _res: &Response) {}
}
