//! In-memory cache tier. Cleartext always -- callers who need in-process
//! memory protection use an external secure-memory toolkit, not this type.

use dashmap::DashMap;
use serde_json::Value;
use std::time::{Duration, Instant};

struct MemoryEntry {
    value: Value,
    tags: Vec<String>,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

#[derive(Default)]
pub struct MemoryTier {
    entries: DashMap<String, MemoryEntry>,
}

impl MemoryTier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let entry = self.entries.get(key)?;
        if entry.is_expired() {
            drop(entry);
            self.entries.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn set(&self, key: &str, value: Value, ttl: Option<Duration>, tags: Vec<String>) {
        self.entries.insert(
            key.to_string(),
            MemoryEntry {
                value,
                tags,
                expires_at: ttl.map(|d| Instant::now() + d),
            },
        );
    }

    pub fn delete(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn exists(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_ttl(&self, key: &str) -> Option<Duration> {
        let entry = self.entries.get(key)?;
        entry
            .expires_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    pub fn expire(&self, key: &str, ttl: Duration) -> bool {
        let Some(mut entry) = self.entries.get_mut(key) else {
            return false;
        };
        entry.expires_at = Some(Instant::now() + ttl);
        true
    }

    pub fn tags_of(&self, key: &str) -> Vec<String> {
        self.entries
            .get(key)
            .map(|e| e.tags.clone())
            .unwrap_or_default()
    }

    /// Glob-lite: `*` matches any suffix/prefix/substring depending on
    /// position; good enough for admin introspection, not a general matcher.
    pub fn keys_matching(&self, pattern: &str) -> Vec<String> {
        if pattern == "*" {
            return self.entries.iter().map(|e| e.key().clone()).collect();
        }
        match (pattern.strip_suffix('*'), pattern.strip_prefix('*')) {
            (Some(prefix), _) => self
                .entries
                .iter()
                .filter(|e| e.key().starts_with(prefix))
                .map(|e| e.key().clone())
                .collect(),
            (_, Some(suffix)) => self
                .entries
                .iter()
                .filter(|e| e.key().ends_with(suffix))
                .map(|e| e.key().clone())
                .collect(),
            _ => self
                .entries
                .iter()
                .filter(|e| e.key() == pattern)
                .map(|e| e.key().clone())
                .collect(),
        }
    }
}
