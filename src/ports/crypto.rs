//! Crypto capability port (spec.md §6).
//!
//! Grounded on `ports/x509.rs`'s async-trait-with-structured-error shape,
//! generalized from X.509-specific operations to the five primitive
//! operations spec.md actually requires of a crypto capability.

use async_trait::async_trait;
use thiserror::Error;

use crate::ids::{Hash32, KeyId};

/// Port for the cryptographic primitives the trust core treats as an
/// external capability rather than implementing itself (spec.md §1: "crypto
/// primitive implementation" is explicitly out of scope for this core).
#[async_trait]
pub trait CryptoPort: Send + Sync {
    /// Collision-resistant hash with fixed 32-byte output.
    fn hash(&self, bytes: &[u8]) -> Hash32;

    /// Sign `payload` with the local private key identified by `key_id`.
    /// Implementations may be deterministic or randomized — callers must not
    /// assume either.
    async fn sign(&self, payload: &[u8], key_id: &KeyId) -> Result<Vec<u8>, CryptoError>;

    /// Verify `signature` over `payload` against `public_key_bytes`. Total —
    /// never panics, never throws on malformed input, just returns `false`.
    fn verify(&self, payload: &[u8], signature: &[u8], public_key_bytes: &[u8]) -> bool;

    /// Generate a new keypair, returning its content-addressed `key_id` and
    /// raw public key bytes. The private key is retained internally by the
    /// adapter (e.g. in a secure element); this port never exposes it.
    async fn generate_keypair(&self) -> Result<(KeyId, Vec<u8>), CryptoError>;

    /// CSPRNG bytes.
    fn random(&self, n: usize) -> Vec<u8>;
}

/// Errors from the crypto capability.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The requested signing key is not available to this adapter.
    #[error("signing key not available: {0}")]
    KeyNotAvailable(String),

    /// The underlying crypto backend failed.
    #[error("crypto backend error: {0}")]
    BackendError(String),
}
