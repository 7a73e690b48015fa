use super::error::{RadixError, RadixResult};
use super::node::RadixTreeNode;
use super::route::{CompiledRoute, RouteParam};
use crate::enums::{HTTP_METHOD_COUNT, HttpMethod};
use crate::handler::HandlerChain;
use crate::path::{normalize_and_validate_path, split_segments};
use crate::pattern::{KindRegistry, ParamValue, Segment, parse_segment};
use crate::types::{RouteKey, RouteMatch};
use hashbrown::HashMap as FastHashMap;
use serde_json::Value;
use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

// Reused across resolves on the same thread so a request doesn't allocate a
// fresh capture buffer; offsets are (start, len) into the path string being
// resolved, never an owned copy of the segment itself.
thread_local! {
    static CAPTURE_BUF: RefCell<Vec<(usize, usize)>> = RefCell::new(Vec::with_capacity(4));
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RadixStats {
    pub registered: usize,
    pub static_routes: usize,
    pub dynamic_routes: usize,
}

/// One per-method radix tree plus the static-route fast path and the central
/// compiled-route table. Mutation (insert/remove) is the caller's
/// responsibility to serialize (the [`crate::router::Router`] facade wraps
/// this in a brief write lock); reads only borrow `&self`.
#[derive(Debug)]
pub struct RadixTree {
    roots: [RadixTreeNode; HTTP_METHOD_COUNT],
    static_routes: [FastHashMap<Box<str>, RouteKey>; HTTP_METHOD_COUNT],
    routes: FastHashMap<RouteKey, CompiledRoute>,
    next_key: AtomicU32,
    kinds: Arc<KindRegistry>,
}

impl RadixTree {
    pub fn new(kinds: Arc<KindRegistry>) -> Self {
        Self {
            roots: Default::default(),
            static_routes: Default::default(),
            routes: FastHashMap::new(),
            next_key: AtomicU32::new(1),
            kinds,
        }
    }

    fn parse_route_segments(&self, path: &str) -> RadixResult<(String, Vec<Segment>)> {
        let normalized = normalize_and_validate_path(path)?;
        let raw_segments = split_segments(&normalized);
        let mut segments = Vec::with_capacity(raw_segments.len());
        for (i, raw) in raw_segments.iter().enumerate() {
            let parsed = parse_segment(raw)?;
            if matches!(parsed, Segment::Wildcard) && i != raw_segments.len() - 1 {
                return Err(RadixError::WildcardNotTerminal {
                    path: normalized.clone(),
                });
            }
            if let Segment::Param {
                kind: Some(kind), ..
            } = &parsed
                && !self.kinds.contains(kind)
            {
                tracing::warn!(path = %normalized, kind = %kind, "unknown parameter kind; matching will always miss this branch");
            }
            segments.push(parsed);
        }
        Ok((normalized, segments))
    }

    /// Registers one route. `priority` and `metadata` are opaque to matching
    /// and only surface through stats/visualize.
    pub fn insert(
        &mut self,
        method: HttpMethod,
        path: &str,
        chain: HandlerChain,
        priority: u32,
        metadata: Value,
    ) -> RadixResult<RouteKey> {
        let (normalized, segments) = self.parse_route_segments(path)?;
        let is_static = segments.iter().all(Segment::is_static);

        let mut params = Vec::with_capacity(segments.len());
        let mut current = &mut self.roots[method.index()];
        for seg in &segments {
            if let Segment::Param { name, kind } = seg {
                if let Some(existing) = current.param_child()
                    && existing.param_kind != *kind
                {
                    tracing::warn!(
                        path = %normalized,
                        existing_kind = ?existing.param_kind,
                        incoming_kind = ?kind,
                        "ambiguous parameter kind at this position; keeping the first-registered kind",
                    );
                }
                params.push(RouteParam {
                    name: name.clone(),
                    kind: kind.clone(),
                });
            }

            let key = seg.storage_key().to_string();
            current = current.descend_or_insert(&key);
            if let Segment::Param { kind, .. } = seg
                && current.param_kind.is_none()
            {
                current.param_kind = kind.clone();
            }
        }

        if current.routes[method.index()].is_some() {
            return Err(RadixError::DuplicateRoute {
                method,
                path: normalized,
            });
        }

        let route_key = self.next_key.fetch_add(1, Ordering::Relaxed);
        let route = CompiledRoute {
            method,
            path: normalized.clone(),
            is_static,
            params,
            chain,
            priority,
            metadata,
        };
        current.routes[method.index()] = Some(route_key);
        current.priority = current.priority.max(priority);

        if is_static {
            self.static_routes[method.index()].insert(normalized.clone().into_boxed_str(), route_key);
        }
        self.routes.insert(route_key, route);
        Ok(route_key)
    }

    pub fn insert_bulk(
        &mut self,
        entries: Vec<(HttpMethod, String, HandlerChain, u32, Value)>,
    ) -> RadixResult<Vec<RouteKey>> {
        let mut out = Vec::with_capacity(entries.len());
        for (method, path, chain, priority, metadata) in entries {
            out.push(self.insert(method, &path, chain, priority, metadata)?);
        }
        Ok(out)
    }

    pub fn remove(&mut self, method: HttpMethod, path: &str) -> RadixResult<CompiledRoute> {
        let (normalized, segments) = self.parse_route_segments(path)?;
        let removed_key = remove_recursive(&mut self.roots[method.index()], method, &segments, 0);
        match removed_key {
            Some(key) => {
                let route = self
                    .routes
                    .remove(&key)
                    .expect("route key present in tree must exist in route table");
                if route.is_static {
                    self.static_routes[method.index()].remove(route.path.as_str());
                }
                Ok(route)
            }
            None => Err(RadixError::RouteNotFound {
                method,
                path: normalized,
            }),
        }
    }

    pub fn resolve(&self, method: HttpMethod, normalized_path: &str) -> Option<RouteMatch> {
        if let Some(&key) = self.static_routes[method.index()].get(normalized_path) {
            return Some(RouteMatch::new(key, Vec::new()));
        }

        CAPTURE_BUF.with(|cell| {
            let mut captures = cell.borrow_mut();
            captures.clear();
            self.resolve_from(&self.roots[method.index()], method, normalized_path, 0, &mut captures)
        })
    }

    /// Walks the tree by byte offset into `path` rather than a pre-split
    /// `Vec<&str>`; parameter captures are `(start, len)` offsets pushed onto
    /// a reused buffer, not owned strings, so backtracking never allocates.
    fn resolve_from(
        &self,
        node: &RadixTreeNode,
        method: HttpMethod,
        path: &str,
        index: usize,
        captures: &mut Vec<(usize, usize)>,
    ) -> Option<RouteMatch> {
        let index = skip_slash(path, index);

        if index >= path.len() {
            let route_key = node.routes[method.index()]?;
            let route = self.routes.get(&route_key)?;
            let bindings = self.bind_params(route, path, captures)?;
            return Some(RouteMatch::new(route_key, bindings));
        }

        let (seg, next_index) = split_segment(path, index);

        if let Some(child) = node.literal_child(seg)
            && let Some(found) = self.resolve_from(child, method, path, next_index, captures)
        {
            return Some(found);
        }

        if let Some(child) = node.param_child() {
            let accepted = match &child.param_kind {
                Some(kind_name) => self
                    .kinds
                    .get(kind_name)
                    .map(|k| k.extract(seg).is_some())
                    .unwrap_or(false),
                None => true,
            };
            if accepted {
                captures.push((index, seg.len()));
                let found = self.resolve_from(child, method, path, next_index, captures);
                if found.is_some() {
                    return found;
                }
                captures.pop();
            }
        }

        if let Some(child) = node.wildcard_child()
            && let Some(route_key) = child.routes[method.index()]
        {
            let route = self.routes.get(&route_key)?;
            let mut bindings = self.bind_params(route, path, captures)?;
            let rest = &path[index..];
            bindings.push(("*".to_string(), ParamValue::Str(rest.to_string())));
            return Some(RouteMatch::new(route_key, bindings));
        }

        None
    }

    fn bind_params(
        &self,
        route: &CompiledRoute,
        path: &str,
        captures: &[(usize, usize)],
    ) -> Option<Vec<(String, ParamValue)>> {
        if captures.len() != route.params.len() {
            return None;
        }
        let mut out = Vec::with_capacity(captures.len());
        for (&(start, len), decl) in captures.iter().zip(route.params.iter()) {
            let raw = path.get(start..start + len)?;
            let value = match &decl.kind {
                Some(kind_name) => self.kinds.get(kind_name)?.extract(raw)?,
                None => ParamValue::Str(raw.to_string()),
            };
            out.push((decl.name.clone(), value));
        }
        Some(out)
    }

    pub fn get(&self, key: RouteKey) -> Option<&CompiledRoute> {
        self.routes.get(&key)
    }

    pub fn list(&self) -> impl Iterator<Item = &CompiledRoute> {
        self.routes.values()
    }

    pub fn stats(&self) -> RadixStats {
        let static_routes = self.routes.values().filter(|r| r.is_static).count();
        RadixStats {
            registered: self.routes.len(),
            static_routes,
            dynamic_routes: self.routes.len() - static_routes,
        }
    }

    /// Renders the per-method trees as indented text, one line per node
    /// edge, for debugging and the testable round-trip property (every
    /// registered route appears exactly once as a leaf).
    pub fn visualize(&self) -> String {
        let mut out = String::new();
        for method in crate::enums::ALL_METHODS {
            let root = &self.roots[method.index()];
            if root.is_empty_leaf() {
                continue;
            }
            out.push_str(&format!("{method}\n"));
            render_node(&mut out, root, method, 1);
        }
        out
    }
}

fn render_node(out: &mut String, node: &RadixTreeNode, method: HttpMethod, depth: usize) {
    if let Some(key) = node.routes[method.index()] {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("(route #{key})\n"));
    }
    for (segment, child) in node.children.iter() {
        out.push_str(&"  ".repeat(depth));
        out.push_str(segment);
        out.push('\n');
        render_node(out, child, method, depth + 1);
    }
}

fn skip_slash(path: &str, index: usize) -> usize {
    if path.as_bytes().get(index) == Some(&b'/') {
        index + 1
    } else {
        index
    }
}

fn split_segment(path: &str, start: usize) -> (&str, usize) {
    let bytes = path.as_bytes();
    let mut end = start;
    while end < bytes.len() && bytes[end] != b'/' {
        end += 1;
    }
    (&path[start..end], end)
}

fn remove_recursive(
    node: &mut RadixTreeNode,
    method: HttpMethod,
    segments: &[Segment],
    idx: usize,
) -> Option<RouteKey> {
    if idx == segments.len() {
        return node.routes[method.index()].take();
    }
    let storage_key = segments[idx].storage_key().to_string();
    let child = node.children.get_mut(storage_key.as_str())?;
    let removed = remove_recursive(child, method, segments, idx + 1);
    if child.is_empty_leaf() {
        node.children.remove(storage_key.as_str());
    }
    removed
}
