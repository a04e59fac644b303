//! Dialog session store trait.

use async_trait::async_trait;
use std::collections::BTreeSet;

use super::model::{DialogSession, Phase};
use crate::error::Result;

/// Keyed per-user dialog state.
///
/// Implementations must be safe to call concurrently for different users.
/// Read-modify-write sequences for the same user are serialized by the caller.
#[async_trait]
pub trait DialogSessionStore: Send + Sync {
    /// Returns the user's session, or a fresh `New` session if none is stored.
    ///
    /// Backends that keep phases in a raw form report unreadable state as
    /// `PathwiseError::StateCorruption`.
    async fn get(&self, user_id: &str) -> Result<DialogSession>;

    /// Upserts the user's phase and missing slots.
    async fn set(&self, user_id: &str, phase: Phase, missing_slots: BTreeSet<String>)
        -> Result<()>;

    /// Removes the user's session. Clearing an absent session is a no-op.
    async fn clear(&self, user_id: &str) -> Result<()>;

    /// Lists every stored session.
    async fn list(&self) -> Result<Vec<DialogSession>>;
}
