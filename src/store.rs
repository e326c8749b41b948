//! Trust Graph Store (spec.md §4.1): the mutable authoritative state —
//! certificates, profiles, and derived indices.
//!
//! Grounded on `domain/trust.rs`'s lookup-trait convention and
//! `adapters/in_memory.rs`'s index-maintenance pattern, generalized from a
//! single-entity store to the certificate/profile pair spec.md §3 defines.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::error::{Result, TrustError};
use crate::hashing;
use crate::ids::{CertId, KeyId, PersonId, ProfileId};
use crate::types::{Certificate, CertificateKind, Key, Profile, TrustKeysPayload};

/// Owns certificates, profiles, and the indices derived from them.
///
/// **Invariant:** every index here is recomputable from `certificates` and
/// `profiles` alone (spec.md §4.1) — [`Self::rebuild_indices`] is the proof.
#[derive(Debug, Default)]
pub struct TrustGraphStore {
    certificates: HashMap<CertId, Certificate>,
    profiles: HashMap<ProfileId, Profile>,
    keys: HashMap<KeyId, Key>,

    /// `person_id -> union of keys across that person's admitted profiles`.
    keys_of_person: HashMap<PersonId, HashSet<KeyId>>,
    /// `key_id -> owning person_id`, the inverse of `keys_of_person`.
    owner_of_key: HashMap<KeyId, PersonId>,
    /// `(endorsed_key_id, kind) -> cert_ids`, admission-ordered.
    certs_by_key_and_kind: HashMap<(KeyId, CertificateKind), Vec<CertId>>,

    next_admission_seq: u64,
}

impl TrustGraphStore {
    /// Construct an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a certificate: validate structure, stamp its `admission_seq`,
    /// and insert it into the store and its indices. Idempotent on
    /// `cert_id` — re-admitting an identical certificate is a no-op.
    pub fn admit_certificate(&mut self, mut cert: Certificate) -> Result<()> {
        if self.certificates.contains_key(&cert.cert_id) {
            debug!(cert_id = %cert.cert_id, "certificate already admitted, ignoring");
            return Ok(());
        }

        self.validate_structure(&cert)?;

        if cert.kind == CertificateKind::TrustKeys {
            let payload: TrustKeysPayload =
                serde_json::from_slice(&cert.payload).map_err(|e| TrustError::MalformedCertificate {
                    cert_id: cert.cert_id.clone(),
                    reason: format!("undecodable TrustKeys payload: {e}"),
                })?;
            cert.endorsed_key_id = Some(payload.endorsed_key_id);
        }

        cert.admission_seq = self.next_admission_seq;
        self.next_admission_seq += 1;

        if let Some(endorsed) = cert.endorsed_key_id.clone() {
            self.certs_by_key_and_kind
                .entry((endorsed, cert.kind))
                .or_default()
                .push(cert.cert_id.clone());
        }

        debug!(cert_id = %cert.cert_id, kind = ?cert.kind, "certificate admitted");
        self.certificates.insert(cert.cert_id.clone(), cert);
        Ok(())
    }

    /// Admit a profile, enforcing timestamp-monotone supersession per
    /// `profile_id` (spec.md §3, §4.1).
    pub fn admit_profile(&mut self, profile: Profile) -> Result<()> {
        if let Some(current) = self.profiles.get(&profile.profile_id) {
            if profile.timestamp <= current.timestamp {
                if profile == *current {
                    debug!(profile_id = %profile.profile_id, "profile already admitted, ignoring");
                    return Ok(());
                }
                warn!(profile_id = %profile.profile_id, "stale profile rejected");
                return Err(TrustError::StaleProfile {
                    profile_id: profile.profile_id.clone(),
                    offered: profile.timestamp,
                    current: current.timestamp,
                });
            }
        }

        for key_id in &profile.keys {
            self.owner_of_key
                .entry(key_id.clone())
                .or_insert_with(|| profile.person_id.clone());
        }

        debug!(profile_id = %profile.profile_id, "profile admitted");
        let person_id = profile.person_id.clone();
        self.profiles.insert(profile.profile_id.clone(), profile);
        self.recompute_keys_of_person(&person_id);
        Ok(())
    }

    /// Recompute `keys_of_person[person_id]` from the currently-admitted
    /// profiles alone, so a superseded profile's keys don't linger (spec.md
    /// §3 invariant: `keys_of(p)` is the union over *admitted* profiles).
    fn recompute_keys_of_person(&mut self, person_id: &PersonId) {
        let keys: HashSet<KeyId> = self
            .profiles
            .values()
            .filter(|p| &p.person_id == person_id)
            .flat_map(|p| p.keys.iter().cloned())
            .collect();
        self.keys_of_person.insert(person_id.clone(), keys);
    }

    /// Register a key and (optionally) its owning person directly, for
    /// adapters that mint keys outside of a profile (e.g. local issuance).
    pub fn register_key(&mut self, key_id: KeyId, public_key_bytes: Vec<u8>, owner: Option<PersonId>) {
        if let Some(owner) = &owner {
            self.keys_of_person
                .entry(owner.clone())
                .or_default()
                .insert(key_id.clone());
            self.owner_of_key.insert(key_id.clone(), owner.clone());
        }
        self.keys.insert(
            key_id.clone(),
            Key {
                key_id,
                public_key_bytes,
            },
        );
    }

    /// Keys known to belong to `person_id`, across all admitted profiles.
    pub fn keys_of(&self, person_id: &PersonId) -> HashSet<KeyId> {
        self.keys_of_person
            .get(person_id)
            .cloned()
            .unwrap_or_default()
    }

    /// The public key bytes registered for `key_id`, if known to the store.
    pub fn public_key_bytes(&self, key_id: &KeyId) -> Option<&[u8]> {
        self.keys.get(key_id).map(|k| k.public_key_bytes.as_slice())
    }

    /// The person this key is known to belong to, if any admitted profile
    /// (or direct registration) asserts ownership.
    pub fn owner_of_key(&self, key_id: &KeyId) -> Option<PersonId> {
        self.owner_of_key.get(key_id).cloned()
    }

    /// Certificates of `kind` that endorse `key_id`, in admission order.
    pub fn certificates_for(&self, key_id: &KeyId, kind: CertificateKind) -> Vec<CertId> {
        let mut ids = self
            .certs_by_key_and_kind
            .get(&(key_id.clone(), kind))
            .cloned()
            .unwrap_or_default();
        ids.sort_by_key(|cert_id| {
            let seq = self
                .certificates
                .get(cert_id)
                .map(|c| c.admission_seq)
                .unwrap_or(u64::MAX);
            (seq, cert_id.as_str().to_string())
        });
        ids
    }

    /// Look up a certificate by id.
    pub fn certificate(&self, cert_id: &CertId) -> Option<&Certificate> {
        self.certificates.get(cert_id)
    }

    /// Look up a profile by id.
    pub fn profile(&self, profile_id: &ProfileId) -> Option<&Profile> {
        self.profiles.get(profile_id)
    }

    /// All admitted certificates, for persistence.
    pub fn all_certificates(&self) -> impl Iterator<Item = &Certificate> {
        self.certificates.values()
    }

    /// All admitted profiles, for persistence.
    pub fn all_profiles(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    /// All registered keys, for persistence.
    pub fn all_keys(&self) -> impl Iterator<Item = &Key> {
        self.keys.values()
    }

    /// All known person ids (profile authors and subjects), for rights
    /// rebuilds.
    pub fn all_persons(&self) -> HashSet<PersonId> {
        self.profiles
            .values()
            .map(|p| p.person_id.clone())
            .chain(self.owner_of_key.values().cloned())
            .collect()
    }

    /// Rebuild every index from `certificates`/`profiles`/`keys` alone. Used
    /// after [`crate::persistence`] loads raw records back into an empty
    /// store.
    pub fn rebuild_indices(&mut self) {
        self.keys_of_person.clear();
        self.owner_of_key.clear();
        self.certs_by_key_and_kind.clear();

        for profile in self.profiles.values() {
            self.keys_of_person
                .entry(profile.person_id.clone())
                .or_default()
                .extend(profile.keys.iter().cloned());
            for key_id in &profile.keys {
                self.owner_of_key
                    .entry(key_id.clone())
                    .or_insert_with(|| profile.person_id.clone());
            }
        }

        for cert in self.certificates.values() {
            if let Some(endorsed) = &cert.endorsed_key_id {
                self.certs_by_key_and_kind
                    .entry((endorsed.clone(), cert.kind))
                    .or_default()
                    .push(cert.cert_id.clone());
            }
        }
    }

    /// Insert a certificate record as-is, without re-stamping
    /// `admission_seq` or re-validating structure. Used by
    /// [`crate::persistence`] to reconstruct an already-admitted store;
    /// callers must follow with [`Self::rebuild_indices`] and
    /// [`Self::restore_admission_counter`].
    pub fn insert_raw_certificate(&mut self, cert: Certificate) {
        self.certificates.insert(cert.cert_id.clone(), cert);
    }

    /// Insert a profile record as-is. See [`Self::insert_raw_certificate`].
    pub fn insert_raw_profile(&mut self, profile: Profile) {
        self.profiles.insert(profile.profile_id.clone(), profile);
    }

    /// Insert a key record as-is. See [`Self::insert_raw_certificate`].
    pub fn insert_raw_key(&mut self, key: Key) {
        self.keys.insert(key.key_id.clone(), key);
    }

    /// After bulk-loading raw certificates, resume admission-sequence
    /// numbering above the highest sequence seen so new admissions still
    /// order after everything loaded.
    pub fn restore_admission_counter(&mut self) {
        self.next_admission_seq = self
            .certificates
            .values()
            .map(|c| c.admission_seq)
            .max()
            .map(|seq| seq + 1)
            .unwrap_or(0);
    }

    fn validate_structure(&self, cert: &Certificate) -> Result<()> {
        if hashing::hash(&cert.payload) != cert.payload_hash {
            return Err(TrustError::HashMismatch {
                cert_id: cert.cert_id.clone(),
            });
        }
        if hashing::hash(&cert.signature) != cert.signature_hash {
            return Err(TrustError::HashMismatch {
                cert_id: cert.cert_id.clone(),
            });
        }
        match cert.kind {
            CertificateKind::TrustKeys => {
                serde_json::from_slice::<TrustKeysPayload>(&cert.payload).map_err(|e| {
                    TrustError::MalformedCertificate {
                        cert_id: cert.cert_id.clone(),
                        reason: format!("undecodable TrustKeys payload: {e}"),
                    }
                })?;
            }
            CertificateKind::RightToDeclareTrustedKeysForEverybody
            | CertificateKind::RightToDeclareTrustedKeysForSelf => {
                serde_json::from_slice::<crate::types::AuthorityPayload>(&cert.payload).map_err(
                    |e| TrustError::MalformedCertificate {
                        cert_id: cert.cert_id.clone(),
                        reason: format!("undecodable authority payload: {e}"),
                    },
                )?;
            }
            CertificateKind::Affirmation => {}
        }
        Ok(())
    }
}
