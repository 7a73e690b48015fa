use crate::enums::HttpMethod;
use crate::handler::HandlerChain;
use serde_json::Value;

/// One parameter as declared on a route, in path order.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteParam {
    pub name: String,
    pub kind: Option<String>,
}

/// An immutable record produced once per `(method, path, handler-chain)`
/// registration. Once inserted into the tree it is never mutated; updates go
/// through remove-and-reinsert.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    pub method: HttpMethod,
    pub path: String,
    pub is_static: bool,
    pub params: Vec<RouteParam>,
    pub chain: HandlerChain,
    pub priority: u32,
    pub metadata: Value,
}

impl CompiledRoute {
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }
}
