//! Cache key namespacing: `XyPriss:v2:<first-16-hex-of-sha256(key)>:<key>`.

use super::error::{CacheError, CacheResult};
use sha2::{Digest, Sha256};

pub const MAX_KEY_LEN: usize = 512;
const NAMESPACE: &str = "XyPriss:v2";

pub fn validate_key(key: &str) -> CacheResult<()> {
    if key.is_empty() {
        return Err(CacheError::EmptyKey);
    }
    if key.len() > MAX_KEY_LEN {
        return Err(CacheError::KeyTooLong { len: key.len() });
    }
    Ok(())
}

/// Namespaces a logical key. Callers must validate it first.
pub fn namespaced(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    let short_hex = digest.iter().take(8).fold(String::with_capacity(16), |mut acc, b| {
        acc.push_str(&format!("{b:02x}"));
        acc
    });
    format!("{NAMESPACE}:{short_hex}:{key}")
}

pub fn tag_set_key(tag: &str) -> String {
    format!("tag:{tag}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_key() {
        assert!(validate_key("").is_err());
    }

    #[test]
    fn rejects_keys_over_512_chars() {
        let long = "a".repeat(513);
        assert!(validate_key(&long).is_err());
        let boundary = "a".repeat(512);
        assert!(validate_key(&boundary).is_ok());
    }

    #[test]
    fn namespacing_is_deterministic() {
        assert_eq!(namespaced("foo"), namespaced("foo"));
        assert_ne!(namespaced("foo"), namespaced("bar"));
        assert!(namespaced("foo").starts_with("XyPriss:v2:"));
    }
}
