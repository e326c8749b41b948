//! # Trusted Keys & Credential Core
//!
//! The trust core for a peer-to-peer identity subsystem on small embedded
//! nodes: given a signed artifact produced by some peer, should this node
//! accept it? Answering that composes root-of-trust selection, certificate
//! chain traversal under cycle risk, rights evaluation (who may endorse keys
//! for whom), signature verification, and durable persistence of the
//! resulting trust graph.
//!
//! ## Architecture
//!
//! The crate follows a hexagonal shape: domain logic at the crate root,
//! [`ports`] define the external capabilities this core requires (a crypto
//! capability, a root-set provider, a persistence substrate), and
//! [`adapters`] are in-tree reference implementations for tests and
//! bring-up. Every mutating and evaluating operation is reached through
//! [`actor::TrustCoreHandle`] — there is no free-standing global state.
//!
//! - [`store`] — the trust graph: certificates, profiles, and derived indices.
//! - [`chain`] — memoized depth-first trust evaluation with cycle detection.
//! - [`rights`] — per-person endorsement authority, derived from certificates.
//! - [`certificates`] — issuance and structural validation.
//! - [`verifier`] — routes signed artifacts to the chain evaluator's verdict.
//! - [`persistence`] — durable storage with cache reconstruction on load.
//! - [`actor`] — the single logical owner serializing all of the above.
//!
//! What this core does **not** do: transport, peer discovery, on-device
//! filesystem primitives, display/UI, crypto primitive implementation
//! (treated as a capability, not implemented here), or key agreement /
//! session encryption. Those are an embedding node's concern.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod actor;
pub mod adapters;
pub mod certificates;
pub mod chain;
pub mod config;
pub mod error;
pub mod hashing;
pub mod ids;
pub mod persistence;
pub mod ports;
pub mod rights;
pub mod store;
pub mod types;
pub mod verifier;

pub use error::{Result, TrustError};

/// Convenience re-exports for embedders wiring up a [`actor::TrustCoreActor`].
pub mod prelude {
    pub use crate::actor::{TrustCoreActor, TrustCoreHandle};
    pub use crate::adapters::{
        FileStorageAdapter, InMemoryStorageAdapter, MockCryptoAdapter, StaticRootSetProvider,
    };
    pub use crate::config::{RootSetMode, TrustCoreConfig};
    pub use crate::error::{Result, TrustError};
    pub use crate::ids::{CertId, Hash32, KeyId, PersonId, ProfileId};
    pub use crate::ports::{CryptoPort, RootSetProvider, StoragePort};
    pub use crate::types::{
        AuthorityPayload, Certificate, CertificateKind, Key, KeyTrustInfo, PersonRights, Profile,
        SignedArtifact, TrustKeysPayload, TrustReason,
    };
}
