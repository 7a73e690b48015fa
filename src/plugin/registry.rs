use super::hook::{Plugin, RateLimitInfo};
use crate::middleware::{Context, Request, Response};
use crate::telemetry::{TelemetryBus, TelemetryEvent};
use dashmap::DashMap;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Holds registered plugins sorted by ascending priority and drives their
/// hooks. A panicking hook is isolated: logged, counted against that plugin
/// only, and treated as a no-op for that call.
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn Plugin>>,
    failures: DashMap<String, AtomicU64>,
    telemetry: TelemetryBus,
}

impl PluginRegistry {
    pub fn new(telemetry: TelemetryBus) -> Self {
        Self {
            plugins: Vec::new(),
            failures: DashMap::new(),
            telemetry,
        }
    }

    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.push(plugin);
        self.plugins.sort_by_key(|p| p.priority());
    }

    /// Registered plugin names with their current failure counts, in
    /// execution-priority order.
    pub fn plugin_stats(&self) -> Vec<(String, u64)> {
        self.plugins
            .iter()
            .map(|p| (p.name().to_string(), self.failure_count(p.name())))
            .collect()
    }

    pub fn failure_count(&self, plugin_name: &str) -> u64 {
        self.failures
            .get(plugin_name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub async fn run_on_server_start(&self) {
        for plugin in &self.plugins {
            self.guard(plugin, "on_server_start", plugin.on_server_start()).await;
        }
    }

    pub async fn run_on_server_stop(&self) {
        for plugin in &self.plugins {
            self.guard(plugin, "on_server_stop", plugin.on_server_stop()).await;
        }
    }

    /// Runs `on_request` for each plugin in priority order; the first one to
    /// return `Some(response)` short-circuits the remaining plugins.
    pub async fn run_on_request(&self, req: &mut Request, ctx: &mut Context) -> Option<Response> {
        for plugin in &self.plugins {
            if let Some(Some(response)) = self.guard(plugin, "on_request", plugin.on_request(req, ctx)).await {
                return Some(response);
            }
        }
        None
    }

    pub async fn run_on_response(&self, res: &mut Response, ctx: &Context, timing: Duration) {
        for plugin in &self.plugins {
            self.guard(plugin, "on_response", plugin.on_response(res, ctx, timing)).await;
        }
    }

    pub async fn run_on_rate_limit(&self, info: &RateLimitInfo, req: &Request, res: &mut Response) {
        for plugin in &self.plugins {
            self.guard(plugin, "on_rate_limit", plugin.on_rate_limit(info, req, res)).await;
        }
    }

    pub async fn run_on_response_time(&self, ms: u64, req: &Request, res: &Response) {
        for plugin in &self.plugins {
            self.guard(plugin, "on_response_time", plugin.on_response_time(ms, req, res))
                .await;
        }
    }

    async fn guard<F, T>(&self, plugin: &Arc<dyn Plugin>, hook: &'static str, fut: F) -> Option<T>
    where
        F: std::future::Future<Output = T>,
    {
        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(value) => Some(value),
            Err(_) => {
                let name = plugin.name().to_string();
                tracing::error!(plugin = %name, hook, "plugin hook panicked; isolating");
                self.failures
                    .entry(name.clone())
                    .or_insert_with(|| AtomicU64::new(0))
                    .fetch_add(1, Ordering::Relaxed);
                self.telemetry.emit(TelemetryEvent::PluginHookFailed { plugin: name, hook });
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::HttpMethod;
    use async_trait::async_trait;

    struct OrderRecorder {
        label: &'static str,
        priority: i32,
        log: Arc<parking_lot::Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl Plugin for OrderRecorder {
        fn name(&self) -> &str {
            self.label
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        async fn on_request(&self, _req: &mut Request, _ctx: &mut Context) -> Option<Response> {
            self.log.lock().push(self.label);
            None
        }
    }

    struct PanicsOnRequest;

    #[async_trait]
    impl Plugin for PanicsOnRequest {
        fn name(&self) -> &str {
            "panics"
        }

        async fn on_request(&self, _req: &mut Request, _ctx: &mut Context) -> Option<Response> {
            panic!("boom");
        }
    }

    #[tokio::test]
    async fn runs_plugins_in_ascending_priority_order() {
        let log = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let mut registry = PluginRegistry::new(TelemetryBus::new());
        registry.register(Arc::new(OrderRecorder { label: "b", priority: 5, log: log.clone() }));
        registry.register(Arc::new(OrderRecorder { label: "a", priority: 1, log: log.clone() }));

        let mut req = Request::new(HttpMethod::Get, "/x");
        let mut ctx = Context::new("/x".into(), HttpMethod::Get, 0);
        registry.run_on_request(&mut req, &mut ctx).await;

        assert_eq!(*log.lock(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn panicking_plugin_is_isolated() {
        let mut registry = PluginRegistry::new(TelemetryBus::new());
        registry.register(Arc::new(PanicsOnRequest));

        let mut req = Request::new(HttpMethod::Get, "/x");
        let mut ctx = Context::new("/x".into(), HttpMethod::Get, 0);
        let response = registry.run_on_request(&mut req, &mut ctx).await;

        assert!(response.is_none());
        assert_eq!(registry.failure_count("panics"), 1);
    }
}
