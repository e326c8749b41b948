//! Fixed root-set provider, for tests and single-operator deployments.

use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::config::RootSetMode;
use crate::ids::KeyId;
use crate::ports::roots::RootSetProvider;

/// A [`RootSetProvider`] backed by an explicitly configured set of keys.
/// `main_identity` is returned for [`RootSetMode::MainIdentity`]; the union
/// of `main_identity` and `additional` is returned for [`RootSetMode::All`].
pub struct StaticRootSetProvider {
    main_identity: RwLock<HashSet<KeyId>>,
    additional: RwLock<HashSet<KeyId>>,
}

impl StaticRootSetProvider {
    /// Construct a provider whose main-identity root set is `main_identity`
    /// and which has no additional roots.
    pub fn new(main_identity: impl IntoIterator<Item = KeyId>) -> Self {
        Self {
            main_identity: RwLock::new(main_identity.into_iter().collect()),
            additional: RwLock::new(HashSet::new()),
        }
    }

    /// Add a key to the main-identity root set.
    pub fn add_main_identity_root(&self, key_id: KeyId) {
        self.main_identity.write().unwrap().insert(key_id);
    }

    /// Add a key to the additional (non-main-identity) root set.
    pub fn add_additional_root(&self, key_id: KeyId) {
        self.additional.write().unwrap().insert(key_id);
    }
}

#[async_trait]
impl RootSetProvider for StaticRootSetProvider {
    async fn current_roots(&self, mode: RootSetMode) -> HashSet<KeyId> {
        match mode {
            RootSetMode::MainIdentity => self.main_identity.read().unwrap().clone(),
            RootSetMode::All => self
                .main_identity
                .read()
                .unwrap()
                .union(&self.additional.read().unwrap())
                .cloned()
                .collect(),
        }
    }
}
