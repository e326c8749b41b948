//! Rights Engine (spec.md §4.3): derives per-person endorsement authority
//! from admitted authority certificates.
//!
//! New logic grounded on the teacher's `domain/pki.rs` capability-bits-on-a-
//! person concept (`KeyPermission`/`KeyDelegation`), narrowed to the spec's
//! two boolean rights.

use std::collections::{HashMap, HashSet};

use crate::chain::ChainEvaluator;
use crate::ids::{KeyId, PersonId};
use crate::ports::crypto::CryptoPort;
use crate::store::TrustGraphStore;
use crate::types::{AuthorityPayload, CertificateKind, PersonRights};

/// Holds the derived `person_rights_map`. Never hand-edited — always
/// produced by [`Self::rebuild`].
#[derive(Debug, Default)]
pub struct RightsEngine {
    rights: HashMap<PersonId, PersonRights>,
}

impl RightsEngine {
    /// Construct an engine with no derived rights (as if rebuilt against an
    /// empty store).
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `person` may endorse keys belonging to anybody.
    pub fn may_endorse_for_everybody(&self, person: &PersonId) -> bool {
        self.rights
            .get(person)
            .map(|r| r.may_endorse_for_everybody)
            .unwrap_or(false)
    }

    /// Whether `person` may endorse only their own keys.
    pub fn may_endorse_for_self(&self, person: &PersonId) -> bool {
        self.rights
            .get(person)
            .map(|r| r.may_endorse_for_self)
            .unwrap_or(false)
    }

    /// A clone of the current `person_rights_map`, for persistence.
    pub fn snapshot(&self) -> HashMap<PersonId, PersonRights> {
        self.rights.clone()
    }

    /// Replace the current map wholesale, for persistence restore. Bypasses
    /// [`Self::rebuild`]'s derivation — callers are responsible for the map
    /// having been produced by a prior `rebuild`.
    pub fn restore(&mut self, rights: HashMap<PersonId, PersonRights>) {
        self.rights = rights;
    }

    /// Rebuild the entire `person_rights_map` from the store's admitted
    /// authority certificates, re-entrant-safe (reads the store, never
    /// mutates it). Must run after every `invalidate_caches()`.
    pub async fn rebuild(
        &mut self,
        store: &TrustGraphStore,
        evaluator: &ChainEvaluator,
        root_set: &HashSet<KeyId>,
        crypto: &dyn CryptoPort,
    ) {
        let mut rights: HashMap<PersonId, PersonRights> = HashMap::new();

        for person in store.all_persons() {
            let owns_root = store
                .keys_of(&person)
                .iter()
                .any(|k| root_set.contains(k));
            if owns_root {
                rights.insert(
                    person,
                    PersonRights {
                        may_endorse_for_everybody: true,
                        may_endorse_for_self: true,
                    },
                );
            }
        }

        for (kind, field_setter): (CertificateKind, fn(&mut PersonRights)) in [
            (CertificateKind::RightToDeclareTrustedKeysForEverybody, (|r: &mut PersonRights| {
                r.may_endorse_for_everybody = true;
            }) as fn(&mut PersonRights)),
            (CertificateKind::RightToDeclareTrustedKeysForSelf, |r: &mut PersonRights| {
                r.may_endorse_for_self = true;
            }),
        ] {
            for cert in store.all_certificates() {
                if cert.kind != kind {
                    continue;
                }
                if crate::hashing::hash(&cert.payload) != cert.payload_hash
                    || crate::hashing::hash(&cert.signature) != cert.signature_hash
                {
                    continue;
                }
                let Ok(payload) = serde_json::from_slice::<AuthorityPayload>(&cert.payload) else {
                    continue;
                };

                // The signer must be cryptographically established as one of
                // the claimed grantor's keys, not merely asserted by the
                // payload -- otherwise any self-signed certificate naming an
                // arbitrary `grantor_person_id` would forge this right.
                let grantor_keys = store.keys_of(&payload.grantor_person_id);
                let mut grantor_trusted = false;
                for key in &grantor_keys {
                    let Some(public_key_bytes) = store.public_key_bytes(key) else {
                        continue;
                    };
                    if !crypto.verify(&cert.payload, &cert.signature, public_key_bytes) {
                        continue;
                    }
                    let verdict = evaluator
                        .is_key_trusted(key, root_set, store, self, crypto)
                        .await;
                    if verdict.trusted {
                        grantor_trusted = true;
                        break;
                    }
                }
                if !grantor_trusted {
                    continue;
                }

                field_setter(rights.entry(payload.grantee_person_id).or_default());
            }
        }

        self.rights = rights;
    }
}
