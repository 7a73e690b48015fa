use super::error::TaskErrorKind;
use hashbrown::HashMap as FastHashMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type OperationResult = Result<Value, TaskErrorKind>;
pub type OperationFuture = Pin<Box<dyn Future<Output = OperationResult> + Send>>;
pub type OperationFn = Arc<dyn Fn(Value) -> OperationFuture + Send + Sync>;

/// Maps a task's `operation` selector to the closure that runs it. Callers
/// register operations once at pool construction; dispatch looks them up by
/// name, mirroring how the radix tree's kind registry resolves `:name<kind>`.
#[derive(Default, Clone)]
pub struct OperationRegistry {
    operations: Arc<RwLock<FastHashMap<String, OperationFn>>>,
}

impl OperationRegistry {
    pub fn register<F, Fut>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = OperationResult> + Send + 'static,
    {
        self.operations
            .write()
            .insert(name.into(), Arc::new(move |payload| Box::pin(f(payload))));
    }

    pub fn get(&self, name: &str) -> Option<OperationFn> {
        self.operations.read().get(name).cloned()
    }
}
