use crate::enums::HttpMethod;
use crate::pattern::ParamValue;
use crate::types::RouteKey;
use hashbrown::HashMap as FastHashMap;
use serde_json::Value;

/// Per-request context threaded through the handler chain: the matched
/// route's path and method, the merged parameter map, and route metadata.
#[derive(Debug, Clone)]
pub struct Context {
    pub route_path: String,
    pub method: HttpMethod,
    pub route_key: RouteKey,
    params: FastHashMap<String, ParamValue>,
    pub metadata: Value,
    /// Index of the handler currently executing, used by the error boundary
    /// to record the failure site.
    pub handler_index: usize,
}

impl Context {
    pub fn new(route_path: String, method: HttpMethod, route_key: RouteKey) -> Self {
        Self {
            route_path,
            method,
            route_key,
            params: FastHashMap::new(),
            metadata: Value::Null,
            handler_index: 0,
        }
    }

    pub fn with_params(mut self, params: Vec<(String, ParamValue)>) -> Self {
        self.params = params.into_iter().collect();
        self
    }

    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }
}
