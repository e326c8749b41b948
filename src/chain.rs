//! Chain Evaluator (spec.md §4.2): memoized depth-first trust evaluation.
//!
//! Grounded on `domain/trust.rs::TrustChainVerifier` (`visited: HashSet`
//! recursion guard, `TrustError::CircularTrust`), generalized from a linear
//! chain walk to the spec's branching multi-candidate DFS gated by
//! [`crate::rights::RightsEngine`].

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::hashing;
use crate::ids::KeyId;
use crate::ports::crypto::CryptoPort;
use crate::rights::RightsEngine;
use crate::store::TrustGraphStore;
use crate::types::{CertificateKind, KeyTrustInfo, TrustKeysPayload, TrustReason};

/// Evaluates `is_key_trusted` over a [`TrustGraphStore`], memoizing verdicts
/// until [`Self::invalidate_caches`] is called.
pub struct ChainEvaluator {
    cache: RefCell<HashMap<KeyId, KeyTrustInfo>>,
}

impl Default for ChainEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainEvaluator {
    /// Construct an evaluator with an empty verdict cache.
    pub fn new() -> Self {
        Self {
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Clear every cached verdict (spec.md §3: required after any admission).
    pub fn invalidate_caches(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Decide whether `key_id` is transitively trusted, per spec.md §4.2's
    /// algorithm. `root_set` is the caller's current root-of-trust set.
    pub async fn is_key_trusted(
        &self,
        key_id: &KeyId,
        root_set: &HashSet<KeyId>,
        store: &TrustGraphStore,
        rights: &RightsEngine,
        crypto: &dyn CryptoPort,
    ) -> KeyTrustInfo {
        let mut visiting = HashSet::new();
        visiting.insert(key_id.clone());
        self.evaluate(key_id, root_set, store, rights, crypto, &mut visiting)
            .await
    }

    fn evaluate<'a>(
        &'a self,
        key_id: &'a KeyId,
        root_set: &'a HashSet<KeyId>,
        store: &'a TrustGraphStore,
        rights: &'a RightsEngine,
        crypto: &'a dyn CryptoPort,
        visiting: &'a mut HashSet<KeyId>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = KeyTrustInfo> + 'a>> {
        Box::pin(async move {
            if let Some(cached) = self.cache.borrow().get(key_id) {
                debug!(key_id = %key_id, "trust verdict cache hit");
                return cached.clone();
            }

            if root_set.contains(key_id) {
                let verdict = KeyTrustInfo::root(key_id.clone());
                self.cache.borrow_mut().insert(key_id.clone(), verdict.clone());
                return verdict;
            }

            let candidates = store.certificates_for(key_id, CertificateKind::TrustKeys);
            for cert_id in candidates {
                let Some(cert) = store.certificate(&cert_id) else {
                    continue;
                };
                if hashing::hash(&cert.payload) != cert.payload_hash
                    || hashing::hash(&cert.signature) != cert.signature_hash
                {
                    debug!(cert_id = %cert_id, "skipping candidate with mismatched hash at traversal time");
                    continue;
                }
                let Ok(payload) = serde_json::from_slice::<TrustKeysPayload>(&cert.payload) else {
                    continue;
                };
                if payload.endorsed_key_id != *key_id {
                    continue;
                }

                let signer_keys = store.keys_of(&payload.signer_person_id);
                let mut verified_signer_key = None;
                for candidate_key in &signer_keys {
                    // The signer's public key bytes aren't stored directly on
                    // `Key` here; a real adapter resolves them via the crypto
                    // capability or the key registry. We verify against the
                    // key material the store holds for this key_id.
                    if let Some(public_key_bytes) = store.public_key_bytes(candidate_key) {
                        if crypto.verify(&cert.payload, &cert.signature, public_key_bytes) {
                            verified_signer_key = Some(candidate_key.clone());
                            break;
                        }
                    }
                }
                let Some(signer_key) = verified_signer_key else {
                    continue;
                };

                if signer_key != *key_id {
                    let signer_may_endorse_broadly = rights.may_endorse_for_everybody(&payload.signer_person_id);
                    let endorsing_self = {
                        let endorsed_owner = store.owner_of_key(key_id);
                        endorsed_owner.as_ref() == Some(&payload.signer_person_id)
                    };
                    let signer_may_endorse_self = rights.may_endorse_for_self(&payload.signer_person_id);
                    if !signer_may_endorse_broadly && !(endorsing_self && signer_may_endorse_self) {
                        continue;
                    }
                }

                if visiting.contains(&signer_key) {
                    continue;
                }

                visiting.insert(signer_key.clone());
                let recursive = self
                    .evaluate(&signer_key, root_set, store, rights, crypto, visiting)
                    .await;
                visiting.remove(&signer_key);

                if recursive.trusted {
                    let mut path = vec![cert_id.clone()];
                    path.extend(recursive.path);
                    let verdict = KeyTrustInfo {
                        key_id: key_id.clone(),
                        trusted: true,
                        reason: TrustReason::EndorsedBy(cert_id),
                        path,
                    };
                    self.cache.borrow_mut().insert(key_id.clone(), verdict.clone());
                    return verdict;
                }
            }

            let verdict = KeyTrustInfo::no_path(key_id.clone());
            self.cache.borrow_mut().insert(key_id.clone(), verdict.clone());
            verdict
        })
    }
}
