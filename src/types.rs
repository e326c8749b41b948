//! Core trust-graph entities: keys, persons, profiles, certificates, and the
//! records produced by evaluating trust over them.
//!
//! Grounded on `value_objects/core.rs` (style: immutable value objects,
//! `Serialize`/`Deserialize` on everything, structured error-adjacent enums)
//! and `domain/pki.rs` (`CertificateType`/`CertificateStatus`-style closed
//! enums).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CertId, Hash32, KeyId, PersonId, ProfileId};

/// An opaque public key, immutable and addressed by its content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    /// Content-hash identifier, derived via [`crate::hashing::key_id_for`].
    pub key_id: KeyId,
    /// Raw public key bytes, opaque to the core.
    pub public_key_bytes: Vec<u8>,
}

/// A signed declaration associating a person with a set of keys and
/// certificates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Identity of this profile record (stable across supersession).
    pub profile_id: ProfileId,
    /// The person this profile describes.
    pub person_id: PersonId,
    /// Person who authored the profile (frequently equal to `person_id`).
    pub owner: PersonId,
    /// Content hash of the profile.
    pub profile_hash: Hash32,
    /// Monotonic wall-clock timestamp; later profiles supersede earlier ones
    /// with the same `profile_id`.
    pub timestamp: u64,
    /// Keys this profile asserts `person_id` owns.
    pub keys: Vec<KeyId>,
    /// Certificates attached to this profile.
    pub certificates: Vec<CertId>,
}

/// The closed set of certificate kinds. Dispatch on `kind` is exhaustive —
/// no open/extensible variant is permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CertificateKind {
    /// A general affirmation; carries no endorsement or rights semantics on
    /// its own.
    Affirmation = 0,
    /// An endorsement: the signer declares `endorsed_key_id` trusted.
    TrustKeys = 1,
    /// Grants the grantee the right to endorse keys for anybody.
    RightToDeclareTrustedKeysForEverybody = 2,
    /// Grants the grantee the right to endorse keys for themselves only.
    RightToDeclareTrustedKeysForSelf = 3,
}

impl CertificateKind {
    /// Decode from the wire `uint8` tag (spec.md §6).
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Affirmation),
            1 => Some(Self::TrustKeys),
            2 => Some(Self::RightToDeclareTrustedKeysForEverybody),
            3 => Some(Self::RightToDeclareTrustedKeysForSelf),
            _ => None,
        }
    }
}

/// Payload schema for a `TrustKeys` certificate (spec.md §6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustKeysPayload {
    /// The person claiming to sign this endorsement.
    pub signer_person_id: PersonId,
    /// The key being endorsed.
    pub endorsed_key_id: KeyId,
}

/// Payload schema shared by the two authority-certificate kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityPayload {
    /// Person granting the right.
    pub grantor_person_id: PersonId,
    /// Person receiving the right.
    pub grantee_person_id: PersonId,
    /// Parsed but never enforced by the core (spec.md §9 open question).
    pub expiration: Option<u64>,
}

/// An immutable, admitted certificate record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Identifier of this certificate.
    pub cert_id: CertId,
    /// Closed kind tag.
    pub kind: CertificateKind,
    /// Raw payload bytes (decodable per `kind`; see `TrustKeysPayload`/
    /// `AuthorityPayload`).
    pub payload: Vec<u8>,
    /// Signature over `payload`.
    pub signature: Vec<u8>,
    /// `H(payload)`, checked as an invariant at admission and at traversal
    /// time.
    pub payload_hash: Hash32,
    /// `H(signature)`.
    pub signature_hash: Hash32,
    /// Wall-clock timestamp, stored but not consulted for expiry (spec.md §9).
    pub timestamp: u64,
    /// Local admission intent only — never authoritative for chain
    /// evaluation (spec.md §9 open question #2).
    pub trusted: bool,
    /// Back-link populated during intake for `TrustKeys` certificates.
    pub endorsed_key_id: Option<KeyId>,
    /// Monotonic admission sequence, stamped by the store. Makes "first in
    /// admission order" (spec.md §9) an explicit, stable tie-break instead
    /// of depending on hash-map iteration order.
    pub admission_seq: u64,
}

/// Why the evaluator reached a given trust verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrustReason {
    /// The key is a member of the current root set.
    Root,
    /// The key was endorsed by the named certificate.
    EndorsedBy(CertId),
    /// Every branch examined led back into the recursion stack; cycles never
    /// produce trust through themselves, but this is not an error.
    CycleBroken,
    /// No admitted, valid, rights-permitted evidence led to trust.
    NoPath,
    /// Structural validation failed at traversal time (re-checked per
    /// candidate certificate per spec.md §4.2 step 4a).
    InvalidCertificate,
}

/// Verdict produced by [`crate::chain::ChainEvaluator::is_key_trusted`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTrustInfo {
    /// The key this verdict is about.
    pub key_id: KeyId,
    /// Whether the key is trusted.
    pub trusted: bool,
    /// Why.
    pub reason: TrustReason,
    /// Ordered path of certificate ids from a root to the key, empty if
    /// untrusted.
    pub path: Vec<CertId>,
}

impl KeyTrustInfo {
    /// Build a trusted-as-root verdict.
    pub fn root(key_id: KeyId) -> Self {
        Self {
            key_id,
            trusted: true,
            reason: TrustReason::Root,
            path: Vec::new(),
        }
    }

    /// Build an untrusted/no-path verdict.
    pub fn no_path(key_id: KeyId) -> Self {
        Self {
            key_id,
            trusted: false,
            reason: TrustReason::NoPath,
            path: Vec::new(),
        }
    }
}

/// Derived per-person capability bits. Never hand-edited — always rebuilt by
/// [`crate::rights::RightsEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonRights {
    /// May endorse keys belonging to anybody.
    pub may_endorse_for_everybody: bool,
    /// May endorse only their own keys.
    pub may_endorse_for_self: bool,
}

/// A signed artifact presented for verification by an external collaborator
/// (spec.md §4.5).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedArtifact {
    /// Person claiming to have produced this artifact.
    pub claimed_signer: PersonId,
    /// The signed payload.
    pub payload: Vec<u8>,
    /// The signature over `payload`.
    pub signature: Vec<u8>,
}

/// Timestamp helper: current wall-clock as used for local certificate
/// issuance (`CertificateOperations::certify`).
pub fn now_unix() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Convenience conversion between `DateTime<Utc>` and the wire `u64` epoch
/// seconds used by `Certificate::timestamp`/`Profile::timestamp`.
pub fn to_unix(dt: DateTime<Utc>) -> u64 {
    dt.timestamp().max(0) as u64
}
