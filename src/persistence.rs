//! Persistence (spec.md §4.6): `Empty -> Dirty -> Clean` state machine over
//! a [`StoragePort`], with atomic per-slot writes and corrupt-slot
//! skip-and-continue recovery on load.
//!
//! Grounded on `storage/mod.rs`'s `FileKeyStorage` (index rebuild on load,
//! per-entry metadata), generalized from a hardcoded filesystem to the
//! `StoragePort` abstraction.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::error::{Result, TrustError};
use crate::hashing;
use crate::ids::PersonId;
use crate::ports::storage::StoragePort;
use crate::rights::RightsEngine;
use crate::store::TrustGraphStore;
use crate::types::{Certificate, Key, PersonRights, Profile};

const NAMESPACE: &str = "trust-core";
const CERT_PREFIX: &str = "cert:";
const PROFILE_PREFIX: &str = "profile:";
const KEY_PREFIX: &str = "key:";
const RIGHTS_SLOT: &str = "rights";

/// Lifecycle state of a persisted trust graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceState {
    /// No admissions since construction or last successful save/load.
    Empty,
    /// Admissions since the last successful save.
    Dirty,
    /// In-memory state matches the durable store exactly.
    Clean,
}

/// Drives [`TrustGraphStore`]/[`RightsEngine`] persistence against a
/// [`StoragePort`].
pub struct TrustPersistence {
    state: PersistenceState,
}

impl Default for TrustPersistence {
    fn default() -> Self {
        Self::new()
    }
}

impl TrustPersistence {
    /// Construct a persistence driver in the `Empty` state.
    pub fn new() -> Self {
        Self {
            state: PersistenceState::Empty,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PersistenceState {
        self.state
    }

    /// Mark the store dirty after an admission. Called by
    /// [`crate::actor::TrustCoreActor`] on every mutating request.
    pub fn mark_dirty(&mut self) {
        self.state = PersistenceState::Dirty;
    }

    /// Write every certificate, profile, key, and the rights snapshot to its
    /// own named slot. Each slot is written atomically by the underlying
    /// [`StoragePort`]; a failure partway through leaves previously-written
    /// slots intact (spec.md §4.6).
    pub async fn save(
        &mut self,
        store: &TrustGraphStore,
        rights: &RightsEngine,
        storage: &dyn StoragePort,
    ) -> Result<()> {
        storage.open(NAMESPACE).await?;

        for cert in store.all_certificates() {
            let slot = format!("{CERT_PREFIX}{}", cert.cert_id);
            let bytes = serde_json::to_vec(cert)
                .map_err(|e| TrustError::MalformedCertificate {
                    cert_id: cert.cert_id.clone(),
                    reason: format!("failed to encode for persistence: {e}"),
                })?;
            storage.write(NAMESPACE, &slot, &encode_slot(&bytes)).await?;
        }

        for profile in store.all_profiles() {
            let slot = format!("{PROFILE_PREFIX}{}", profile.profile_id);
            let bytes = serde_json::to_vec(profile).expect("Profile always encodes");
            storage.write(NAMESPACE, &slot, &encode_slot(&bytes)).await?;
        }

        for key in store.all_keys() {
            let slot = format!("{KEY_PREFIX}{}", key.key_id);
            let bytes = serde_json::to_vec(key).expect("Key always encodes");
            storage.write(NAMESPACE, &slot, &encode_slot(&bytes)).await?;
        }

        let rights_bytes = serde_json::to_vec(&rights.snapshot()).expect("rights map always encodes");
        storage
            .write(NAMESPACE, RIGHTS_SLOT, &encode_slot(&rights_bytes))
            .await?;

        info!("trust graph saved");
        self.state = PersistenceState::Clean;
        Ok(())
    }

    /// Load every slot back into `store`/`rights`, rebuilding indices.
    /// Slots that fail their hash self-check are skipped; the count of
    /// skipped slots is reported rather than failing the whole load
    /// (spec.md §7: `CorruptSlot` is recovered locally).
    pub async fn load(
        &mut self,
        store: &mut TrustGraphStore,
        rights: &mut RightsEngine,
        storage: &dyn StoragePort,
    ) -> Result<usize> {
        storage.open(NAMESPACE).await?;
        let mut corrupt = 0usize;

        for slot in storage.enumerate(NAMESPACE, CERT_PREFIX).await? {
            match self.load_one::<Certificate>(storage, &slot).await {
                Some(cert) => store.insert_raw_certificate(cert),
                None => corrupt += 1,
            }
        }
        for slot in storage.enumerate(NAMESPACE, PROFILE_PREFIX).await? {
            match self.load_one::<Profile>(storage, &slot).await {
                Some(profile) => store.insert_raw_profile(profile),
                None => corrupt += 1,
            }
        }
        for slot in storage.enumerate(NAMESPACE, KEY_PREFIX).await? {
            match self.load_one::<Key>(storage, &slot).await {
                Some(key) => store.insert_raw_key(key),
                None => corrupt += 1,
            }
        }

        match storage.read(NAMESPACE, RIGHTS_SLOT).await {
            Ok(raw) => match decode_slot(&raw).and_then(|bytes| {
                serde_json::from_slice::<HashMap<PersonId, PersonRights>>(&bytes).ok()
            }) {
                Some(map) => rights.restore(map),
                None => corrupt += 1,
            },
            Err(crate::ports::storage::StorageError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        store.rebuild_indices();
        store.restore_admission_counter();

        if corrupt > 0 {
            warn!(corrupt, "skipped corrupt slots during load");
        }
        self.state = PersistenceState::Clean;
        Ok(corrupt)
    }

    async fn load_one<T: serde::de::DeserializeOwned>(
        &self,
        storage: &dyn StoragePort,
        slot: &str,
    ) -> Option<T> {
        let raw = storage.read(NAMESPACE, slot).await.ok()?;
        let bytes = decode_slot(&raw)?;
        serde_json::from_slice(&bytes).ok()
    }
}

fn encode_slot(bytes: &[u8]) -> Vec<u8> {
    let digest = hashing::hash(bytes);
    let mut out = Vec::with_capacity(32 + bytes.len());
    out.extend_from_slice(&digest.0);
    out.extend_from_slice(bytes);
    out
}

fn decode_slot(data: &[u8]) -> Option<Vec<u8>> {
    if data.len() < 32 {
        return None;
    }
    let (hash_bytes, payload) = data.split_at(32);
    let mut expected = [0u8; 32];
    expected.copy_from_slice(hash_bytes);
    if hashing::hash(payload).0 != expected {
        return None;
    }
    Some(payload.to_vec())
}
