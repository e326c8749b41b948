//! Persistence round-trip tests: save/load cache reconstruction, corrupt-slot
//! skip behavior, and atomic single-slot semantics, against a real
//! filesystem `StoragePort`.

use trust_keys_core::adapters::{FileStorageAdapter, MockCryptoAdapter};
use trust_keys_core::hashing;
use trust_keys_core::ids::{CertId, Hash32, KeyId, PersonId, ProfileId};
use trust_keys_core::persistence::{PersistenceState, TrustPersistence};
use trust_keys_core::ports::crypto::CryptoPort;
use trust_keys_core::ports::storage::StoragePort;
use trust_keys_core::rights::RightsEngine;
use trust_keys_core::store::TrustGraphStore;
use trust_keys_core::types::{Certificate, CertificateKind, Profile};

fn affirmation_cert(cert_id: &str) -> Certificate {
    let payload = format!("payload-{cert_id}").into_bytes();
    let signature = format!("sig-{cert_id}").into_bytes();
    Certificate {
        cert_id: CertId::new(cert_id),
        kind: CertificateKind::Affirmation,
        payload_hash: hashing::hash(&payload),
        signature_hash: hashing::hash(&signature),
        payload,
        signature,
        timestamp: 0,
        trusted: true,
        endorsed_key_id: None,
        admission_seq: 0,
    }
}

#[tokio::test]
async fn save_then_load_reproduces_certificates_profiles_and_keys() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorageAdapter::new(dir.path());
    let crypto = MockCryptoAdapter::new();

    let mut store = TrustGraphStore::new();
    store.admit_certificate(affirmation_cert("c1")).unwrap();
    store.admit_certificate(affirmation_cert("c2")).unwrap();
    store
        .admit_profile(Profile {
            profile_id: ProfileId::new("prof1"),
            person_id: PersonId::new("P1"),
            owner: PersonId::new("P1"),
            profile_hash: Hash32([9u8; 32]),
            timestamp: 1,
            keys: vec![KeyId::new("k1")],
            certificates: vec![CertId::new("c1")],
        })
        .unwrap();
    let (key_id, public_key) = crypto.generate_keypair().await.unwrap();
    store.register_key(key_id.clone(), public_key, Some(PersonId::new("P1")));

    let rights = RightsEngine::new();
    let mut persistence = TrustPersistence::new();
    persistence.save(&store, &rights, &storage).await.unwrap();
    assert_eq!(persistence.state(), PersistenceState::Clean);

    let mut loaded_store = TrustGraphStore::new();
    let mut loaded_rights = RightsEngine::new();
    let corrupt = persistence
        .load(&mut loaded_store, &mut loaded_rights, &storage)
        .await
        .unwrap();

    assert_eq!(corrupt, 0);
    assert!(loaded_store.certificate(&CertId::new("c1")).is_some());
    assert!(loaded_store.certificate(&CertId::new("c2")).is_some());
    assert!(loaded_store.profile(&ProfileId::new("prof1")).is_some());
    assert_eq!(loaded_store.keys_of(&PersonId::new("P1")), store.keys_of(&PersonId::new("P1")));
    assert_eq!(loaded_store.public_key_bytes(&key_id), store.public_key_bytes(&key_id));
}

#[tokio::test]
async fn a_slot_tampered_on_disk_after_save_is_skipped_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorageAdapter::new(dir.path());

    let mut store = TrustGraphStore::new();
    store.admit_certificate(affirmation_cert("good")).unwrap();
    store.admit_certificate(affirmation_cert("bad")).unwrap();
    let rights = RightsEngine::new();

    let mut persistence = TrustPersistence::new();
    persistence.save(&store, &rights, &storage).await.unwrap();

    // Corrupt the "bad" certificate's slot directly on disk.
    storage.write("trust-core", "cert:bad", b"garbage, not a hash-prefixed slot").await.unwrap();

    let mut loaded_store = TrustGraphStore::new();
    let mut loaded_rights = RightsEngine::new();
    let corrupt = persistence
        .load(&mut loaded_store, &mut loaded_rights, &storage)
        .await
        .unwrap();

    assert_eq!(corrupt, 1);
    assert!(loaded_store.certificate(&CertId::new("good")).is_some());
    assert!(loaded_store.certificate(&CertId::new("bad")).is_none());
}

#[tokio::test]
async fn loading_an_empty_store_reports_no_corruption() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorageAdapter::new(dir.path());
    let mut store = TrustGraphStore::new();
    let mut rights = RightsEngine::new();
    let mut persistence = TrustPersistence::new();

    let corrupt = persistence.load(&mut store, &mut rights, &storage).await.unwrap();
    assert_eq!(corrupt, 0);
    assert_eq!(store.all_certificates().count(), 0);
}
