//! Root-set provider port (spec.md §6).

use std::collections::HashSet;

use async_trait::async_trait;

use crate::config::RootSetMode;
use crate::ids::KeyId;

/// Supplies the externally-defined set of root keys. The evaluator accepts
/// this set as input and never hard-codes identities (spec.md §3).
///
/// Callers must invoke [`crate::chain::ChainEvaluator`]'s cache invalidation
/// after the underlying root set changes — this port itself does not push
/// change notifications.
#[async_trait]
pub trait RootSetProvider: Send + Sync {
    /// Current root set for the given query mode.
    async fn current_roots(&self, mode: RootSetMode) -> HashSet<KeyId>;
}
