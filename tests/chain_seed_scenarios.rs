//! Literal seed-scenario table: six numbered setups and their expected
//! verdicts, exercised end-to-end against the public API.

use std::collections::HashSet;

use trust_keys_core::adapters::mock_crypto::MockCryptoAdapter;
use trust_keys_core::chain::ChainEvaluator;
use trust_keys_core::hashing;
use trust_keys_core::ids::{CertId, KeyId, PersonId};
use trust_keys_core::ports::crypto::CryptoPort;
use trust_keys_core::rights::RightsEngine;
use trust_keys_core::store::TrustGraphStore;
use trust_keys_core::types::{
    AuthorityPayload, Certificate, CertificateKind, TrustKeysPayload, TrustReason,
};

async fn trust_keys_cert(
    crypto: &MockCryptoAdapter,
    cert_id: &str,
    signer_key: &KeyId,
    signer_person: &str,
    endorsed_key: &str,
) -> Certificate {
    let payload = serde_json::to_vec(&TrustKeysPayload {
        signer_person_id: PersonId::new(signer_person),
        endorsed_key_id: KeyId::new(endorsed_key),
    })
    .unwrap();
    let signature = crypto.sign(&payload, signer_key).await.unwrap();
    Certificate {
        cert_id: CertId::new(cert_id),
        kind: CertificateKind::TrustKeys,
        payload_hash: hashing::hash(&payload),
        signature_hash: hashing::hash(&signature),
        payload,
        signature,
        timestamp: 0,
        trusted: false,
        endorsed_key_id: None,
        admission_seq: 0,
    }
}

async fn authority_cert(
    crypto: &MockCryptoAdapter,
    cert_id: &str,
    signer_key: &KeyId,
    kind: CertificateKind,
    grantor: &str,
    grantee: &str,
) -> Certificate {
    let payload = serde_json::to_vec(&AuthorityPayload {
        grantor_person_id: PersonId::new(grantor),
        grantee_person_id: PersonId::new(grantee),
        expiration: None,
    })
    .unwrap();
    let signature = crypto.sign(&payload, signer_key).await.unwrap();
    Certificate {
        cert_id: CertId::new(cert_id),
        kind,
        payload_hash: hashing::hash(&payload),
        signature_hash: hashing::hash(&signature),
        payload,
        signature,
        timestamp: 0,
        trusted: false,
        endorsed_key_id: None,
        admission_seq: 0,
    }
}

/// Scenario 1: root_set = {K_R}; no certs; `is_key_trusted(K_R)` is trusted
/// as `Root` with an empty path.
#[tokio::test]
async fn scenario_1_root_key_with_no_certificates() {
    let crypto = MockCryptoAdapter::new();
    let store = TrustGraphStore::new();
    let rights = RightsEngine::new();
    let evaluator = ChainEvaluator::new();

    let (root_key, _) = crypto.generate_keypair().await.unwrap();
    let root_set = HashSet::from([root_key.clone()]);

    let verdict = evaluator
        .is_key_trusted(&root_key, &root_set, &store, &rights, &crypto)
        .await;
    assert!(verdict.trusted);
    assert_eq!(verdict.reason, TrustReason::Root);
    assert!(verdict.path.is_empty());
}

/// Scenario 2: a TrustKeys certificate signed by the root's owner endorses
/// K_A; `is_key_trusted(K_A)` is trusted, endorsed by that certificate.
#[tokio::test]
async fn scenario_2_direct_endorsement_by_root_owner() {
    let crypto = MockCryptoAdapter::new();
    let mut store = TrustGraphStore::new();
    let rights = RightsEngine::new();
    let evaluator = ChainEvaluator::new();

    let (root_key, root_pub) = crypto.generate_keypair().await.unwrap();
    store.register_key(root_key.clone(), root_pub, Some(PersonId::new("P_R")));
    let root_set = HashSet::from([root_key.clone()]);

    let c1 = trust_keys_cert(&crypto, "c1", &root_key, "P_R", "K_A").await;
    store.admit_certificate(c1).unwrap();

    let verdict = evaluator
        .is_key_trusted(&KeyId::new("K_A"), &root_set, &store, &rights, &crypto)
        .await;
    assert!(verdict.trusted);
    assert_eq!(verdict.reason, TrustReason::EndorsedBy(CertId::new("c1")));
    assert_eq!(verdict.path, vec![CertId::new("c1")]);
}

/// Scenario 3: as (2), plus a TrustKeys cert from P_A (owning K_A) endorsing
/// K_B, but P_A lacks `may_endorse_for_everybody` — K_B stays untrusted.
#[tokio::test]
async fn scenario_3_cross_person_endorsement_without_rights_is_rejected() {
    let crypto = MockCryptoAdapter::new();
    let mut store = TrustGraphStore::new();
    let evaluator = ChainEvaluator::new();

    let (root_key, root_pub) = crypto.generate_keypair().await.unwrap();
    store.register_key(root_key.clone(), root_pub, Some(PersonId::new("P_R")));
    let root_set = HashSet::from([root_key.clone()]);

    let (key_a, pub_a) = crypto.generate_keypair().await.unwrap();
    store.register_key(key_a.clone(), pub_a, Some(PersonId::new("P_A")));

    store
        .admit_certificate(trust_keys_cert(&crypto, "c1", &root_key, "P_R", key_a.as_str()).await)
        .unwrap();
    store
        .admit_certificate(trust_keys_cert(&crypto, "c2", &key_a, "P_A", "K_B").await)
        .unwrap();

    let mut rights = RightsEngine::new();
    rights.rebuild(&store, &evaluator, &root_set, &crypto).await;

    let verdict = evaluator
        .is_key_trusted(&KeyId::new("K_B"), &root_set, &store, &rights, &crypto)
        .await;
    assert!(!verdict.trusted);
    assert_eq!(verdict.reason, TrustReason::NoPath);
}

/// Scenario 4: as (3), plus a `RightToDeclareTrustedKeysForEverybody`
/// certificate granting P_A, signed by P_R — K_B becomes trusted via c2.
#[tokio::test]
async fn scenario_4_granted_rights_enable_cross_person_endorsement() {
    let crypto = MockCryptoAdapter::new();
    let mut store = TrustGraphStore::new();
    let evaluator = ChainEvaluator::new();

    let (root_key, root_pub) = crypto.generate_keypair().await.unwrap();
    store.register_key(root_key.clone(), root_pub, Some(PersonId::new("P_R")));
    let root_set = HashSet::from([root_key.clone()]);

    let (key_a, pub_a) = crypto.generate_keypair().await.unwrap();
    store.register_key(key_a.clone(), pub_a, Some(PersonId::new("P_A")));

    store
        .admit_certificate(trust_keys_cert(&crypto, "c1", &root_key, "P_R", key_a.as_str()).await)
        .unwrap();
    store
        .admit_certificate(trust_keys_cert(&crypto, "c2", &key_a, "P_A", "K_B").await)
        .unwrap();
    store
        .admit_certificate(
            authority_cert(
                &crypto,
                "c3",
                &root_key,
                CertificateKind::RightToDeclareTrustedKeysForEverybody,
                "P_R",
                "P_A",
            )
            .await,
        )
        .unwrap();

    let mut rights = RightsEngine::new();
    rights.rebuild(&store, &evaluator, &root_set, &crypto).await;

    let verdict = evaluator
        .is_key_trusted(&KeyId::new("K_B"), &root_set, &store, &rights, &crypto)
        .await;
    assert!(verdict.trusted);
    assert_eq!(verdict.reason, TrustReason::EndorsedBy(CertId::new("c2")));
    assert_eq!(verdict.path, vec![CertId::new("c2"), CertId::new("c1")]);
}

/// Scenario 5: two certs forming a cycle (`ca` endorses K_X signed by P_Y,
/// `cb` endorses K_Y signed by P_X), neither root — both stay untrusted.
#[tokio::test]
async fn scenario_5_cycle_never_produces_trust() {
    let crypto = MockCryptoAdapter::new();
    let mut store = TrustGraphStore::new();
    let evaluator = ChainEvaluator::new();
    let rights = RightsEngine::new();
    let root_set: HashSet<KeyId> = HashSet::new();

    let (key_x, pub_x) = crypto.generate_keypair().await.unwrap();
    let (key_y, pub_y) = crypto.generate_keypair().await.unwrap();
    store.register_key(key_x.clone(), pub_x, Some(PersonId::new("P_X")));
    store.register_key(key_y.clone(), pub_y, Some(PersonId::new("P_Y")));

    store
        .admit_certificate(trust_keys_cert(&crypto, "ca", &key_y, "P_Y", key_x.as_str()).await)
        .unwrap();
    store
        .admit_certificate(trust_keys_cert(&crypto, "cb", &key_x, "P_X", key_y.as_str()).await)
        .unwrap();

    let verdict = evaluator
        .is_key_trusted(&key_x, &root_set, &store, &rights, &crypto)
        .await;
    assert!(!verdict.trusted);
    assert_eq!(verdict.reason, TrustReason::NoPath);
}

/// Scenario 6: admitting a certificate whose `payload_hash` differs from
/// `H(payload)` is rejected and leaves the store unchanged.
#[tokio::test]
async fn scenario_6_hash_mismatch_is_rejected_and_store_unchanged() {
    let crypto = MockCryptoAdapter::new();
    let mut store = TrustGraphStore::new();
    let (key, _pub) = crypto.generate_keypair().await.unwrap();

    let mut cert = trust_keys_cert(&crypto, "c1", &key, "P_R", "K_A").await;
    cert.payload_hash = trust_keys_core::ids::Hash32::from_hex(&"0".repeat(64)).unwrap();

    let result = store.admit_certificate(cert);
    assert!(result.is_err());
    assert_eq!(store.all_certificates().count(), 0);
}
