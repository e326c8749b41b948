//! Canonical hashing of certificate payloads and signatures.
//!
//! Grounded on `value_objects/core.rs::Certificate::fingerprint` and
//! `certificate_service.rs`'s SHA-256 fingerprint computation in the
//! teacher — here generalized from "certificate fingerprint" to the two
//! standalone hash fields spec.md §3 requires (`payload_hash`,
//! `signature_hash`), each independently re-derivable.

use sha2::{Digest, Sha256};

use crate::ids::Hash32;

/// Collision-resistant hash used for `payload_hash`/`signature_hash` and for
/// deriving `key_id` from raw public key bytes.
pub fn hash(bytes: &[u8]) -> Hash32 {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    Hash32(out)
}

/// Derive the content-addressed `key_id` for a raw public key.
pub fn key_id_for(public_key_bytes: &[u8]) -> crate::ids::KeyId {
    crate::ids::KeyId::new(hash(public_key_bytes).to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(hash(b"hello"), hash(b"hello"));
        assert_ne!(hash(b"hello"), hash(b"world"));
    }

    #[test]
    fn key_id_is_stable_for_same_bytes() {
        let a = key_id_for(b"pubkey-bytes");
        let b = key_id_for(b"pubkey-bytes");
        assert_eq!(a, b);
    }
}
