//! Adapters (implementations) of the trust core's ports.
//!
//! These are reference/test implementations. A real embedded node supplies
//! its own hardware-backed `CryptoPort`, a flash-backed `StoragePort`, and a
//! `RootSetProvider` wired to its own identity bootstrap — none of that is
//! this crate's concern (spec.md §1).

pub mod file_storage;
pub mod in_memory_storage;
pub mod mock_crypto;
pub mod static_roots;

pub use file_storage::FileStorageAdapter;
pub use in_memory_storage::InMemoryStorageAdapter;
pub use mock_crypto::MockCryptoAdapter;
pub use static_roots::StaticRootSetProvider;