use dashmap::DashMap;
use serde_json::Value;

/// Status of a component this crate does not own (file-watcher, TypeScript
/// checker) but surfaces under the admin endpoints when a plugin reports in.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExternalComponentStatus {
    pub enabled: bool,
    pub detail: Value,
}

/// A place for out-of-scope plugins to publish their status so the admin
/// surface can report on them without this crate knowing their internals.
#[derive(Default)]
pub struct ExternalStatusRegistry {
    statuses: DashMap<String, ExternalComponentStatus>,
}

impl ExternalStatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, component: impl Into<String>, enabled: bool, detail: Value) {
        self.statuses.insert(component.into(), ExternalComponentStatus { enabled, detail });
    }

    pub fn get(&self, component: &str) -> Option<ExternalComponentStatus> {
        self.statuses.get(component).map(|s| s.clone())
    }

    pub fn all(&self) -> Vec<(String, ExternalComponentStatus)> {
        self.statuses.iter().map(|e| (e.key().clone(), e.value().clone())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unreported_component_is_none() {
        let registry = ExternalStatusRegistry::new();
        assert!(registry.get("file_watcher_status").is_none());
    }

    #[test]
    fn reported_component_is_retrievable() {
        let registry = ExternalStatusRegistry::new();
        registry.report("file_watcher_status", true, json!({ "watching": 12 }));
        let status = registry.get("file_watcher_status").unwrap();
        assert!(status.enabled);
        assert_eq!(status.detail, json!({ "watching": 12 }));
    }

    #[test]
    fn later_report_overwrites_earlier_one() {
        let registry = ExternalStatusRegistry::new();
        registry.report("typescript_check_status", true, json!({}));
        registry.report("typescript_check_status", false, json!({ "error": "timeout" }));
        let status = registry.get("typescript_check_status").unwrap();
        assert!(!status.enabled);
    }

    #[test]
    fn all_lists_every_reported_component() {
        let registry = ExternalStatusRegistry::new();
        registry.report("a", true, json!(null));
        registry.report("b", true, json!(null));
        let names: Vec<String> = registry.all().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"a".to_string()));
        assert!(names.contains(&"b".to_string()));
    }
}
