//! Small shared value types used across the route engine, cluster and pool.

use crate::pattern::ParamValue;

pub type StaticString = &'static str;

/// Id of an HTTP-serving worker process, assigned by the cluster supervisor.
pub type WorkerId = u32;

/// Opaque key identifying a compiled route inside a [`crate::radix::RadixTree`].
pub type RouteKey = u32;

/// A single extracted path parameter: its declared name and the typed value
/// produced by the matcher kind that validated it.
pub type ParamBinding = (String, ParamValue);

/// Result of a successful route resolution: the matched route's key plus the
/// ordered parameter bindings captured along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
    pub route_key: RouteKey,
    pub params: Vec<ParamBinding>,
}

impl RouteMatch {
    pub fn new(route_key: RouteKey, params: Vec<ParamBinding>) -> Self {
        Self { route_key, params }
    }

    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}
