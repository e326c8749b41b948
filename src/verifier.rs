//! Signature Verifier (spec.md §4.5): routes a signed artifact to the
//! Chain Evaluator's verdict for whichever candidate key actually signed it.
//!
//! Grounded on `ports/x509.rs::verify_chain`'s "delegate to the crypto
//! capability, never short-circuit" shape.

use std::collections::HashSet;

use crate::chain::ChainEvaluator;
use crate::ids::KeyId;
use crate::ports::crypto::CryptoPort;
use crate::rights::RightsEngine;
use crate::store::TrustGraphStore;
use crate::types::{KeyTrustInfo, SignedArtifact};

/// Verifies [`SignedArtifact`]s against a claimed signer's candidate keys,
/// always routing through the [`ChainEvaluator`] so trust revocation (via
/// `invalidate_caches`) is observed on every call.
pub struct SignatureVerifier;

impl SignatureVerifier {
    /// Resolve `artifact.claimed_signer`'s candidate keys, verify the
    /// signature against each, and return the evaluator's verdict for the
    /// first key that verifies. `None` if no candidate key verifies.
    pub async fn verify(
        artifact: &SignedArtifact,
        store: &TrustGraphStore,
        evaluator: &ChainEvaluator,
        rights: &RightsEngine,
        crypto: &dyn CryptoPort,
        root_set: &HashSet<KeyId>,
    ) -> Option<KeyTrustInfo> {
        let candidate_keys = store.keys_of(&artifact.claimed_signer);
        for key_id in candidate_keys {
            let Some(public_key_bytes) = store.public_key_bytes(&key_id) else {
                continue;
            };
            if crypto.verify(&artifact.payload, &artifact.signature, public_key_bytes) {
                return Some(
                    evaluator
                        .is_key_trusted(&key_id, root_set, store, rights, crypto)
                        .await,
                );
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock_crypto::MockCryptoAdapter;
    use crate::ids::PersonId;

    #[tokio::test]
    async fn verify_returns_none_for_unverifiable_signature() {
        let mut store = TrustGraphStore::new();
        let crypto = MockCryptoAdapter::new();
        let (key_id, public_key) = crypto.generate_keypair().await.unwrap();
        store.register_key(key_id, public_key, Some(PersonId::new("P1")));

        let artifact = SignedArtifact {
            claimed_signer: PersonId::new("P1"),
            payload: b"payload".to_vec(),
            signature: b"not-a-real-signature-not-a-real-signature-not-a-real-sig".to_vec(),
        };

        let evaluator = ChainEvaluator::new();
        let rights = RightsEngine::new();
        let root_set = HashSet::new();
        let verdict =
            SignatureVerifier::verify(&artifact, &store, &evaluator, &rights, &crypto, &root_set)
                .await;
        assert!(verdict.is_none());
    }

    #[tokio::test]
    async fn verify_returns_root_verdict_for_valid_signature_by_root() {
        let mut store = TrustGraphStore::new();
        let crypto = MockCryptoAdapter::new();
        let (key_id, public_key) = crypto.generate_keypair().await.unwrap();
        store.register_key(key_id.clone(), public_key, Some(PersonId::new("P1")));

        let payload = b"hello world".to_vec();
        let signature = crypto.sign(&payload, &key_id).await.unwrap();
        let artifact = SignedArtifact {
            claimed_signer: PersonId::new("P1"),
            payload,
            signature,
        };

        let evaluator = ChainEvaluator::new();
        let rights = RightsEngine::new();
        let root_set = HashSet::from([key_id]);
        let verdict =
            SignatureVerifier::verify(&artifact, &store, &evaluator, &rights, &crypto, &root_set)
                .await
                .unwrap();
        assert!(verdict.trusted);
    }
}
