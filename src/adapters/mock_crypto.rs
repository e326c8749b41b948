//! Deterministic, real (not fabricated) crypto adapter for tests.
//!
//! Grounded on `adapters/x509_mock.rs`'s "fake-but-functional adapter beside
//! the real one" convention, built on actual Ed25519 signatures via
//! `ed25519-dalek` and SHA-256 via `sha2` rather than stub bytes, so tests
//! exercising `CryptoPort::verify` reject tampered signatures for real.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::hashing;
use crate::ids::{Hash32, KeyId};
use crate::ports::crypto::{CryptoError, CryptoPort};

/// In-memory Ed25519 signer/verifier. Each `generate_keypair()` call mints a
/// new keypair and retains the private half internally, keyed by `key_id`.
#[derive(Default)]
pub struct MockCryptoAdapter {
    keys: RwLock<HashMap<KeyId, SigningKey>>,
}

impl MockCryptoAdapter {
    /// Construct an adapter with no keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Import an externally-generated signing key under its derived
    /// `key_id`, for tests that need to control key material directly.
    pub fn import(&self, signing_key: SigningKey) -> KeyId {
        let key_id = hashing::key_id_for(signing_key.verifying_key().as_bytes());
        self.keys.write().unwrap().insert(key_id.clone(), signing_key);
        key_id
    }
}

#[async_trait]
impl CryptoPort for MockCryptoAdapter {
    fn hash(&self, bytes: &[u8]) -> Hash32 {
        hashing::hash(bytes)
    }

    async fn sign(&self, payload: &[u8], key_id: &KeyId) -> Result<Vec<u8>, CryptoError> {
        let keys = self.keys.read().unwrap();
        let signing_key = keys
            .get(key_id)
            .ok_or_else(|| CryptoError::KeyNotAvailable(key_id.to_string()))?;
        Ok(signing_key.sign(payload).to_bytes().to_vec())
    }

    fn verify(&self, payload: &[u8], signature: &[u8], public_key_bytes: &[u8]) -> bool {
        let Ok(vk_bytes) = <[u8; 32]>::try_from(public_key_bytes) else {
            return false;
        };
        let Ok(verifying_key) = VerifyingKey::from_bytes(&vk_bytes) else {
            return false;
        };
        let Ok(sig_bytes) = <[u8; 64]>::try_from(signature) else {
            return false;
        };
        let signature = Signature::from_bytes(&sig_bytes);
        verifying_key.verify(payload, &signature).is_ok()
    }

    async fn generate_keypair(&self) -> Result<(KeyId, Vec<u8>), CryptoError> {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        let signing_key = SigningKey::from_bytes(&seed);
        let public_key_bytes = signing_key.verifying_key().as_bytes().to_vec();
        let key_id = hashing::key_id_for(&public_key_bytes);
        self.keys.write().unwrap().insert(key_id.clone(), signing_key);
        Ok((key_id, public_key_bytes))
    }

    fn random(&self, n: usize) -> Vec<u8> {
        let mut buf = vec![0u8; n];
        OsRng.fill_bytes(&mut buf);
        buf
    }
}
