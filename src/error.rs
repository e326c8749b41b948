//! Crate-wide error type for the trust core.

use thiserror::Error;

use crate::ids::{CertId, ProfileId};
use crate::ports::crypto::CryptoError;
use crate::ports::storage::StorageError;

/// Result type alias used throughout the trust core.
pub type Result<T> = std::result::Result<T, TrustError>;

/// Errors the trust core can surface to its caller.
///
/// `CycleDetected` and `NoTrustPath` from spec.md §7 are deliberately absent
/// here: the evaluator encodes both as a `TrustReason` on a returned
/// `KeyTrustInfo`, never as an `Err`.
#[derive(Error, Debug)]
pub enum TrustError {
    /// A certificate failed structural validation at admission time.
    #[error("malformed certificate {cert_id}: {reason}")]
    MalformedCertificate {
        /// The certificate that was rejected.
        cert_id: CertId,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// `payload_hash` or `signature_hash` did not match the recomputed hash.
    #[error("hash mismatch on certificate {cert_id}")]
    HashMismatch {
        /// The certificate whose self-check failed.
        cert_id: CertId,
    },

    /// A profile was admitted with a timestamp not greater than the
    /// currently admitted version for the same `profile_id`.
    #[error("stale profile {profile_id}: timestamp {offered} <= current {current}")]
    StaleProfile {
        /// Profile that was rejected.
        profile_id: ProfileId,
        /// Timestamp on the rejected profile.
        offered: u64,
        /// Timestamp already admitted for this profile.
        current: u64,
    },

    /// The crypto capability failed or was unavailable for an operation that
    /// required it.
    #[error("crypto capability unavailable: {0}")]
    CryptoUnavailable(#[from] CryptoError),

    /// The persistence substrate failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A slot failed its hash self-check on load and was skipped.
    ///
    /// Surfaced as a count, not a hard failure — `load()` recovers locally
    /// per spec.md §7.
    #[error("{count} corrupt slot(s) skipped during load")]
    CorruptSlots {
        /// Number of slots skipped.
        count: usize,
    },
}
