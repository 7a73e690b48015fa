use super::external::ExternalStatusRegistry;
use crate::cache::HybridCache;
use crate::cluster::ClusterSupervisor;
use crate::plugin::PluginRegistry;
use crate::pool::{TaskKind, WorkerTaskPool};
use crate::router::Router;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Aggregates status across subsystems for the optional administrative
/// endpoints mounted under `/XyPriss`. File-watching and the TypeScript
/// checker live outside this crate's scope entirely; their sections are
/// populated only if a plugin reports into [`ExternalStatusRegistry`].
pub struct AdminPanel {
    enabled: AtomicBool,
    router: Arc<Router>,
    cache: Arc<HybridCache>,
    pool: Arc<WorkerTaskPool>,
    cluster: Option<Arc<ClusterSupervisor>>,
    plugins: Arc<PluginRegistry>,
    external: ExternalStatusRegistry,
}

impl AdminPanel {
    pub fn new(
        router: Arc<Router>,
        cache: Arc<HybridCache>,
        pool: Arc<WorkerTaskPool>,
        cluster: Option<Arc<ClusterSupervisor>>,
        plugins: Arc<PluginRegistry>,
    ) -> Self {
        Self {
            enabled: AtomicBool::new(true),
            router,
            cache,
            pool,
            cluster,
            plugins,
            external: ExternalStatusRegistry::new(),
        }
    }

    pub fn external_status(&self) -> &ExternalStatusRegistry {
        &self.external
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Renders the full admin report as JSON. Callers that mount this under
    /// `/XyPriss` should check `is_enabled` first and respond 404 if not.
    pub async fn report(&self) -> serde_json::Value {
        let router_stats = self.router.stats();
        let cache_stats = self.cache.stats();
        let cache_health = self.cache.health().await;

        let cluster_metrics = match &self.cluster {
            Some(supervisor) => {
                let workers = supervisor.worker_snapshot().await;
                json!({
                    "enabled": true,
                    "workers": workers.iter().map(|w| json!({
                        "id": w.id,
                        "pid": w.pid,
                        "port": w.port,
                        "health": format!("{:?}", w.health),
                        "active_connections": w.active_connections,
                        "restart_count": w.restart_count,
                    })).collect::<Vec<_>>(),
                })
            }
            None => json!({ "enabled": false }),
        };

        json!({
            "router": {
                "registered": router_stats.registered,
                "static_routes": router_stats.static_routes,
                "dynamic_routes": router_stats.dynamic_routes,
                "executions": router_stats.executions,
                "cache_hits": router_stats.cache_hits,
                "cache_misses": router_stats.cache_misses,
                "avg_resolve_time_ns": router_stats.avg_resolve_time_ns,
            },
            "cache": {
                "memory_hits": cache_stats.memory_hits,
                "memory_misses": cache_stats.memory_misses,
                "redis_hits": cache_stats.redis_hits,
                "redis_misses": cache_stats.redis_misses,
                "sets": cache_stats.sets,
                "promotions": cache_stats.promotions,
                "health": format!("{:?}", cache_health),
            },
            "task_pool": {
                "cpu_queue_len": self.pool.queue_len(TaskKind::Cpu),
                "cpu_active_workers": self.pool.active_workers(TaskKind::Cpu),
                "io_queue_len": self.pool.queue_len(TaskKind::Io),
                "io_active_workers": self.pool.active_workers(TaskKind::Io),
            },
            "cluster": cluster_metrics,
            "plugins": self.plugins.plugin_stats().into_iter().map(|(name, failures)| json!({
                "name": name,
                "failures": failures,
            })).collect::<Vec<_>>(),
            "file_watcher_status": self.external.get("file_watcher_status"),
            "file_watcher_stats": self.external.get("file_watcher_stats"),
            "typescript_check_status": self.external.get("typescript_check_status"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::pool::WorkerTaskPoolConfig;
    use crate::telemetry::TelemetryBus;

    async fn build_panel() -> AdminPanel {
        let router = Arc::new(Router::new());
        let cache = Arc::new(HybridCache::new(CacheConfig::default()).await);
        let pool = Arc::new(WorkerTaskPool::new(WorkerTaskPoolConfig::default()));
        let plugins = Arc::new(PluginRegistry::new(TelemetryBus::new()));
        AdminPanel::new(router, cache, pool, None, plugins)
    }

    #[tokio::test]
    async fn report_with_no_cluster_marks_cluster_disabled() {
        let panel = build_panel().await;
        let report = panel.report().await;
        assert_eq!(report["cluster"]["enabled"], false);
        assert_eq!(report["router"]["registered"], 0);
    }

    #[tokio::test]
    async fn enabled_flag_defaults_true_and_is_toggleable() {
        let panel = build_panel().await;
        assert!(panel.is_enabled());
        panel.set_enabled(false);
        assert!(!panel.is_enabled());
    }

    #[tokio::test]
    async fn report_surfaces_external_status_reports() {
        let panel = build_panel().await;
        panel.external_status().report("file_watcher_status", true, serde_json::json!({ "watching": 3 }));
        let report = panel.report().await;
        assert_eq!(report["file_watcher_status"]["enabled"], true);
    }
}
