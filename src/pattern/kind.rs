//! Named parameter matchers ("kinds"). A kind validates a captured path
//! segment and converts it into a typed [`ParamValue`]. Built-in kinds cover
//! the common cases from the route grammar (`:name<kind>`); callers may
//! register additional kinds at construction time.

use hashbrown::HashMap as FastHashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            ParamValue::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            ParamValue::Str(_) => None,
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(v) => write!(f, "{v}"),
        }
    }
}

pub type ExtractFn = Arc<dyn Fn(&str) -> Option<ParamValue> + Send + Sync>;

#[derive(Clone)]
pub struct ParamKind {
    pub name: &'static str,
    extract: ExtractFn,
}

impl std::fmt::Debug for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamKind").field("name", &self.name).finish()
    }
}

impl ParamKind {
    pub fn new(name: &'static str, extract: ExtractFn) -> Self {
        Self { name, extract }
    }

    /// Validates and extracts the value; `None` means the segment does not
    /// satisfy this kind.
    pub fn extract(&self, raw: &str) -> Option<ParamValue> {
        (self.extract)(raw)
    }
}

static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("static uuid regex is valid")
});
static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("static slug regex is valid"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email regex is valid")
});

fn builtin_id() -> ParamKind {
    ParamKind::new(
        "id",
        Arc::new(|raw| raw.parse::<i64>().ok().map(ParamValue::Int)),
    )
}

fn builtin_uuid() -> ParamKind {
    ParamKind::new(
        "uuid",
        Arc::new(|raw| UUID_RE.is_match(raw).then(|| ParamValue::Str(raw.to_string()))),
    )
}

fn builtin_slug() -> ParamKind {
    ParamKind::new(
        "slug",
        Arc::new(|raw| SLUG_RE.is_match(raw).then(|| ParamValue::Str(raw.to_string()))),
    )
}

fn builtin_email() -> ParamKind {
    ParamKind::new(
        "email",
        Arc::new(|raw| EMAIL_RE.is_match(raw).then(|| ParamValue::Str(raw.to_string()))),
    )
}

fn builtin_alpha() -> ParamKind {
    ParamKind::new(
        "alpha",
        Arc::new(|raw| {
            (!raw.is_empty() && raw.chars().all(|c| c.is_ascii_alphabetic()))
                .then(|| ParamValue::Str(raw.to_string()))
        }),
    )
}

fn builtin_any() -> ParamKind {
    ParamKind::new(
        "any",
        Arc::new(|raw| Some(ParamValue::Str(raw.to_string()))),
    )
}

/// Owns the set of kinds a [`crate::router::Router`] accepts in `:name<kind>`
/// annotations. Constructed once and shared read-only thereafter; registering
/// a new kind takes a brief write lock, mirroring the route registry itself.
#[derive(Debug)]
pub struct KindRegistry {
    kinds: parking_lot::RwLock<FastHashMap<String, ParamKind>>,
}

impl Default for KindRegistry {
    fn default() -> Self {
        let mut kinds = FastHashMap::new();
        for kind in [
            builtin_id(),
            builtin_uuid(),
            builtin_slug(),
            builtin_email(),
            builtin_alpha(),
            builtin_any(),
        ] {
            kinds.insert(kind.name.to_string(), kind);
        }
        Self {
            kinds: parking_lot::RwLock::new(kinds),
        }
    }
}

impl KindRegistry {
    pub fn register(&self, name: &'static str, extract: ExtractFn) {
        self.kinds
            .write()
            .insert(name.to_string(), ParamKind::new(name, extract));
    }

    pub fn get(&self, name: &str) -> Option<ParamKind> {
        self.kinds.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.read().contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_kind_parses_integers_only() {
        let reg = KindRegistry::default();
        let id = reg.get("id").unwrap();
        assert_eq!(id.extract("42"), Some(ParamValue::Int(42)));
        assert_eq!(id.extract("abc"), None);
    }

    #[test]
    fn unknown_kind_is_absent() {
        let reg = KindRegistry::default();
        assert!(reg.get("does-not-exist").is_none());
    }

    #[test]
    fn custom_kind_can_be_registered() {
        let reg = KindRegistry::default();
        reg.register(
            "even",
            Arc::new(|raw| {
                raw.parse::<i64>()
                    .ok()
                    .filter(|v| v % 2 == 0)
                    .map(ParamValue::Int)
            }),
        );
        let even = reg.get("even").unwrap();
        assert_eq!(even.extract("4"), Some(ParamValue::Int(4)));
        assert_eq!(even.extract("3"), None);
    }
}
