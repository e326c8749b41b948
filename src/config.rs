//! Configuration Module
//!
//! Centralized configuration for the trust core: storage location, root-set
//! query mode, and logging. Modeled on the teacher's `Config`/`NatsConfig`
//! pattern (`Default` picking an offline-friendly posture).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root-of-trust query mode, passed to
/// [`crate::ports::roots::RootSetProvider::current_roots`] (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RootSetMode {
    /// Only the node's own main identity root.
    MainIdentity,
    /// All roots the node currently recognizes.
    All,
}

/// Application configuration for the trust core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustCoreConfig {
    /// Root path under which the persistence substrate stores its slots.
    pub storage_root: PathBuf,

    /// Which root-set query mode the actor uses by default.
    pub root_mode: RootSetMode,

    /// `tracing_subscriber::EnvFilter` directive string, if the embedder
    /// wants the core to install its own subscriber. `None` means the
    /// embedder manages tracing itself.
    pub tracing_env_filter: Option<String>,
}

impl Default for TrustCoreConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("./trust-store"),
            root_mode: RootSetMode::MainIdentity,
            tracing_env_filter: None,
        }
    }
}

impl TrustCoreConfig {
    /// Installs a global `tracing_subscriber` using [`Self::tracing_env_filter`],
    /// if set. A no-op when the embedder manages its own subscriber.
    ///
    /// Returns an error if a global subscriber is already installed.
    pub fn init_tracing(&self) -> Result<(), tracing_subscriber::util::TryInitError> {
        let Some(directive) = &self.tracing_env_filter else {
            return Ok(());
        };
        let filter = tracing_subscriber::EnvFilter::try_new(directive)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    }
}
