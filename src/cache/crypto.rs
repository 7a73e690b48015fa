//! AES-256-GCM encryption envelope for at-rest Redis values. The IV (nonce)
//! is stored alongside the ciphertext inside the envelope so decryption
//! never needs an out-of-band IV store.

use super::error::{CacheError, CacheResult};
use aes_gcm::aead::{Aead, KeyInit, OsRng, rand_core::RngCore};
use aes_gcm::{Aes256Gcm, Key, Nonce};

const NONCE_LEN: usize = 12;

pub struct CipherEnvelope {
    cipher: Aes256Gcm,
}

impl CipherEnvelope {
    pub fn new(master_key: &[u8; 32]) -> Self {
        let key = Key::<Aes256Gcm>::from_slice(master_key);
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Returns `nonce || ciphertext`.
    pub fn seal(&self, plaintext: &[u8]) -> CacheResult<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);
        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| CacheError::Encryption(e.to_string()))?;
        let mut envelope = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        envelope.extend_from_slice(&nonce_bytes);
        envelope.extend_from_slice(&ciphertext);
        Ok(envelope)
    }

    pub fn open(&self, envelope: &[u8]) -> CacheResult<Vec<u8>> {
        if envelope.len() < NONCE_LEN {
            return Err(CacheError::Encryption("envelope too short".to_string()));
        }
        let (nonce_bytes, ciphertext) = envelope.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);
        self.cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| CacheError::Encryption(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_plaintext() {
        let envelope = CipherEnvelope::new(&[7u8; 32]);
        let sealed = envelope.seal(b"hello world").unwrap();
        assert_eq!(envelope.open(&sealed).unwrap(), b"hello world");
    }

    #[test]
    fn distinct_seals_use_distinct_nonces() {
        let envelope = CipherEnvelope::new(&[7u8; 32]);
        let a = envelope.seal(b"same").unwrap();
        let b = envelope.seal(b"same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn tampered_envelope_fails_to_open() {
        let envelope = CipherEnvelope::new(&[7u8; 32]);
        let mut sealed = envelope.seal(b"hello").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0xFF;
        assert!(envelope.open(&sealed).is_err());
    }
}
