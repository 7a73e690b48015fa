use super::errors::{RouterError, RouterResult};
use crate::enums::HttpMethod;
use crate::handler::{BoxHandler, HandlerChain};
use crate::pattern::KindRegistry;
use crate::registry::{RegistryStatsSnapshot, RouteRegistry};
use crate::radix::CompiledRoute;
use crate::path::normalize_and_validate_path;
use crate::types::{RouteKey, RouteMatch};
use serde_json::Value;
use std::sync::Arc;

/// Public facade over the route engine: registration, resolution, removal,
/// introspection. Shared freely across worker threads/tasks -- every method
/// takes `&self`.
pub struct Router {
    registry: Arc<RouteRegistry>,
    kinds: Arc<KindRegistry>,
}

impl Router {
    pub fn new() -> Self {
        super::RouterOptions::new().build()
    }

    pub(crate) fn with_kinds(kinds: Arc<KindRegistry>) -> Self {
        Self {
            registry: Arc::new(RouteRegistry::new(kinds.clone())),
            kinds,
        }
    }

    pub fn kinds(&self) -> &KindRegistry {
        &self.kinds
    }

    /// Registers one route with an explicit middleware list and terminal
    /// handler. `priority` only affects advisory cache/visualize ordering.
    pub fn register(
        &self,
        method: HttpMethod,
        path: &str,
        middlewares: Vec<BoxHandler>,
        terminal: BoxHandler,
        priority: u32,
        metadata: Value,
    ) -> RouterResult<RouteKey> {
        let chain = HandlerChain::new(middlewares, terminal);
        self.registry
            .register(method, path, chain, priority, metadata)
            .map_err(RouterError::from)
    }

    pub fn get(&self, path: &str, terminal: BoxHandler) -> RouterResult<RouteKey> {
        self.register(HttpMethod::Get, path, Vec::new(), terminal, 0, Value::Null)
    }

    pub fn post(&self, path: &str, terminal: BoxHandler) -> RouterResult<RouteKey> {
        self.register(HttpMethod::Post, path, Vec::new(), terminal, 0, Value::Null)
    }

    pub fn put(&self, path: &str, terminal: BoxHandler) -> RouterResult<RouteKey> {
        self.register(HttpMethod::Put, path, Vec::new(), terminal, 0, Value::Null)
    }

    pub fn delete(&self, path: &str, terminal: BoxHandler) -> RouterResult<RouteKey> {
        self.register(HttpMethod::Delete, path, Vec::new(), terminal, 0, Value::Null)
    }

    pub fn patch(&self, path: &str, terminal: BoxHandler) -> RouterResult<RouteKey> {
        self.register(HttpMethod::Patch, path, Vec::new(), terminal, 0, Value::Null)
    }

    /// Registers a batch of routes under a single write lock. Entries are
    /// inserted in order; a failure partway through leaves the tree holding
    /// whatever had already been inserted, same as `insert_bulk` itself.
    pub fn register_bulk(&self, entries: Vec<RouteSpec>) -> RouterResult<Vec<RouteKey>> {
        let chains = entries
            .into_iter()
            .map(|spec| {
                (
                    spec.method,
                    spec.path,
                    HandlerChain::new(spec.middlewares, spec.terminal),
                    spec.priority,
                    spec.metadata,
                )
            })
            .collect();
        self.registry
            .register_bulk(chains)
            .map_err(RouterError::from)
    }

    pub fn remove(&self, method: HttpMethod, path: &str) -> RouterResult<CompiledRoute> {
        self.registry.remove(method, path).map_err(RouterError::from)
    }

    /// Normalizes `path`, consults the predictive cache, then the radix
    /// tree. Returns [`RouterError::Miss`] rather than `Option` so callers
    /// that `?`-propagate get a uniform error type; 404 mapping happens one
    /// layer up in the HTTP surface.
    pub fn resolve(&self, method: HttpMethod, path: &str) -> RouterResult<RouteMatch> {
        let normalized =
            normalize_and_validate_path(path).map_err(|e| RouterError::from(crate::radix::RadixError::from(e)))?;
        self.registry
            .resolve(method, &normalized)
            .ok_or_else(|| RouterError::Miss {
                method,
                path: normalized,
            })
    }

    pub fn list(&self) -> Vec<CompiledRoute> {
        self.registry.list()
    }

    pub fn visualize(&self) -> String {
        self.registry.visualize()
    }

    pub fn stats(&self) -> RegistryStatsSnapshot {
        self.registry.stats()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// One entry in a [`Router::register_bulk`] call.
pub struct RouteSpec {
    pub method: HttpMethod,
    pub path: String,
    pub middlewares: Vec<BoxHandler>,
    pub terminal: BoxHandler,
    pub priority: u32,
    pub metadata: Value,
}

impl RouteSpec {
    pub fn new(method: HttpMethod, path: impl Into<String>, terminal: BoxHandler) -> Self {
        Self {
            method,
            path: path.into(),
            middlewares: Vec::new(),
            terminal,
            priority: 0,
            metadata: Value::Null,
        }
    }

    pub fn with_middlewares(mut self, middlewares: Vec<BoxHandler>) -> Self {
        self.middlewares = middlewares;
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}
