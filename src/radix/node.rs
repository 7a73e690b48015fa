//! The radix tree node: a segment literal, parameter marker, or wildcard
//! marker; a child map; and, at terminal nodes, one compiled route per HTTP
//! method. See the data model's "Radix Node" entry for the invariants this
//! type upholds.

use crate::enums::{HTTP_METHOD_COUNT, HttpMethod};
use crate::pattern::{PARAM_TOKEN, WILDCARD_TOKEN};
use crate::types::RouteKey;
use hashbrown::HashMap as FastHashMap;

#[derive(Debug, Default)]
pub struct RadixTreeNode {
    /// Children keyed by storage key: literal segment verbatim, `:param` for
    /// any parameter segment, `*` for the wildcard.
    pub children: FastHashMap<Box<str>, Box<RadixTreeNode>>,
    /// The named kind constraint for this node's *own* incoming `:param`
    /// edge, if any (`None` means a bare `:name` with no kind, i.e. `any`).
    /// Meaningless for nodes reached via a literal or wildcard edge.
    pub param_kind: Option<String>,
    /// Compiled route per method, present only when this node is a terminal
    /// for that method.
    pub routes: [Option<RouteKey>; HTTP_METHOD_COUNT],
    /// Highest priority among routes stored at this node; used only for the
    /// advisory frequency-sorted rebuild, never for matching semantics.
    pub priority: u32,
}

impl RadixTreeNode {
    pub fn is_terminal_for(&self, method: HttpMethod) -> bool {
        self.routes[method.index()].is_some()
    }

    pub fn literal_child(&self, segment: &str) -> Option<&RadixTreeNode> {
        self.children.get(segment).map(|b| b.as_ref())
    }

    pub fn param_child(&self) -> Option<&RadixTreeNode> {
        self.children.get(PARAM_TOKEN).map(|b| b.as_ref())
    }

    pub fn wildcard_child(&self) -> Option<&RadixTreeNode> {
        self.children.get(WILDCARD_TOKEN).map(|b| b.as_ref())
    }

    pub fn literal_child_mut(&mut self, segment: &str) -> Option<&mut RadixTreeNode> {
        self.children.get_mut(segment).map(|b| b.as_mut())
    }

    pub fn is_empty_leaf(&self) -> bool {
        self.children.is_empty() && self.routes.iter().all(Option::is_none)
    }

    pub fn descend_or_insert(&mut self, key: &str) -> &mut RadixTreeNode {
        if !self.children.contains_key(key) {
            self.children
                .insert(Box::from(key), Box::new(RadixTreeNode::default()));
        }
        self.children.get_mut(key).expect("just inserted")
    }
}
