//! Certificate Operations (spec.md §4.4): issuance, structural validation,
//! and issuer-attestation queries.
//!
//! Grounded on `certificate_service.rs` (issuance computing hash + signature
//! + timestamp) and `domain/trust.rs`'s validation styling.

use crate::chain::ChainEvaluator;
use crate::hashing;
use crate::ids::{CertId, KeyId, PersonId};
use crate::ports::crypto::CryptoPort;
use crate::store::TrustGraphStore;
use crate::types::{now_unix, Certificate, CertificateKind};
use std::collections::HashSet;

/// Local certificate issuance and peer-certificate validation, as a thin
/// layer over the crypto capability and the store.
pub struct CertificateOperations;

impl CertificateOperations {
    /// Issue a new certificate of `kind` over `payload`, signed by the local
    /// key `signing_key_id`. Never populates `endorsed_key_id` — that
    /// back-link is derived at admission time for peer-sourced certificates
    /// too (spec.md §4.1), so local issuance leaves it unset here.
    pub async fn certify(
        crypto: &dyn CryptoPort,
        cert_id: CertId,
        kind: CertificateKind,
        payload: Vec<u8>,
        signing_key_id: &KeyId,
    ) -> crate::error::Result<Certificate> {
        let signature = crypto.sign(&payload, signing_key_id).await?;
        let payload_hash = hashing::hash(&payload);
        let signature_hash = hashing::hash(&signature);
        Ok(Certificate {
            cert_id,
            kind,
            payload,
            signature,
            payload_hash,
            signature_hash,
            timestamp: now_unix(),
            trusted: true,
            endorsed_key_id: None,
            admission_seq: 0,
        })
    }

    /// Structural validation only: hashes match, payload decodes for `kind`.
    /// Deliberately does **not** verify the signature — that happens lazily
    /// at traversal time via [`crate::verifier::SignatureVerifier`] /
    /// [`ChainEvaluator`] (spec.md §4.4).
    pub fn validate_certificate(cert: &Certificate) -> bool {
        if hashing::hash(&cert.payload) != cert.payload_hash {
            return false;
        }
        if hashing::hash(&cert.signature) != cert.signature_hash {
            return false;
        }
        match cert.kind {
            CertificateKind::TrustKeys => {
                serde_json::from_slice::<crate::types::TrustKeysPayload>(&cert.payload).is_ok()
            }
            CertificateKind::RightToDeclareTrustedKeysForEverybody
            | CertificateKind::RightToDeclareTrustedKeysForSelf => {
                serde_json::from_slice::<crate::types::AuthorityPayload>(&cert.payload).is_ok()
            }
            CertificateKind::Affirmation => true,
        }
    }

    /// Whether `subject`'s keys carry a `kind` certificate issued by a
    /// trusted key of `issuer` (spec.md §4.4).
    pub async fn is_certified_by(
        store: &TrustGraphStore,
        evaluator: &ChainEvaluator,
        rights: &crate::rights::RightsEngine,
        crypto: &dyn CryptoPort,
        root_set: &HashSet<KeyId>,
        subject: &KeyId,
        kind: CertificateKind,
        issuer: &PersonId,
    ) -> bool {
        for cert_id in store.certificates_for(subject, kind) {
            let Some(cert) = store.certificate(&cert_id) else {
                continue;
            };
            let Ok(payload) = serde_json::from_slice::<crate::types::TrustKeysPayload>(&cert.payload)
            else {
                continue;
            };
            if payload.signer_person_id != *issuer {
                continue;
            }
            let issuer_keys = store.keys_of(issuer);
            for key in &issuer_keys {
                if !store
                    .public_key_bytes(key)
                    .map(|pk| crypto.verify(&cert.payload, &cert.signature, pk))
                    .unwrap_or(false)
                {
                    continue;
                }
                let verdict = evaluator
                    .is_key_trusted(key, root_set, store, rights, crypto)
                    .await;
                if verdict.trusted {
                    return true;
                }
            }
        }
        false
    }
}
