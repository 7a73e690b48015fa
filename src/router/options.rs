use crate::pattern::{ExtractFn, KindRegistry};
use std::sync::Arc;

/// Builder for a [`super::Router`]. Mirrors the registry's defaults unless
/// overridden before `build()`.
#[derive(Default)]
pub struct RouterOptions {
    extra_kinds: Vec<(&'static str, ExtractFn)>,
}

impl RouterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an additional parameter kind, available for `:name<kind>`
    /// segments once the router is built.
    pub fn with_kind(mut self, name: &'static str, extract: ExtractFn) -> Self {
        self.extra_kinds.push((name, extract));
        self
    }

    pub fn build(self) -> super::Router {
        let kinds = Arc::new(KindRegistry::default());
        for (name, extract) in self.extra_kinds {
            kinds.register(name, extract);
        }
        super::Router::with_kinds(kinds)
    }
}
