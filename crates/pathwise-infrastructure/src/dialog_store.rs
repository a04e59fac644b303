//! In-memory dialog session store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pathwise_core::dialog::{DialogSession, DialogSessionStore, Phase};
use pathwise_core::error::Result;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Stored form of a session. The phase is kept by name, like a key-value row.
#[derive(Debug, Clone)]
struct SessionRow {
    phase: String,
    missing_slots: BTreeSet<String>,
    updated_at: DateTime<Utc>,
}

/// Process-local [`DialogSessionStore`].
///
/// Sessions live as long as the store; nothing is written to disk.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDialogSessionStore {
    rows: Arc<RwLock<HashMap<String, SessionRow>>>,
}

impl InMemoryDialogSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a raw phase name for a user, bypassing validation.
    ///
    /// Seeds rows that `get` and `list` must read back, including ones whose
    /// phase name is not a valid `Phase`.
    pub async fn insert_raw(&self, user_id: &str, phase: &str, missing_slots: BTreeSet<String>) {
        let mut rows = self.rows.write().await;
        rows.insert(
            user_id.to_string(),
            SessionRow {
                phase: phase.to_string(),
                missing_slots,
                updated_at: Utc::now(),
            },
        );
    }

    fn to_session(user_id: &str, row: &SessionRow) -> Result<DialogSession> {
        Ok(DialogSession {
            user_id: user_id.to_string(),
            phase: Phase::parse_stored(user_id, &row.phase)?,
            missing_slots: row.missing_slots.clone(),
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl DialogSessionStore for InMemoryDialogSessionStore {
    async fn get(&self, user_id: &str) -> Result<DialogSession> {
        let rows = self.rows.read().await;
        match rows.get(user_id) {
            Some(row) => Self::to_session(user_id, row),
            None => Ok(DialogSession::fresh(user_id)),
        }
    }

    async fn set(
        &self,
        user_id: &str,
        phase: Phase,
        missing_slots: BTreeSet<String>,
    ) -> Result<()> {
        let mut rows = self.rows.write().await;
        rows.insert(
            user_id.to_string(),
            SessionRow {
                phase: phase.to_string(),
                missing_slots,
                updated_at: Utc::now(),
            },
        );
        tracing::debug!(target: "pathwise::dialog", user_id, %phase, "Session stored");
        Ok(())
    }

    async fn clear(&self, user_id: &str) -> Result<()> {
        let mut rows = self.rows.write().await;
        rows.remove(user_id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<DialogSession>> {
        let rows = self.rows.read().await;
        let mut sessions = rows
            .iter()
            .map(|(user_id, row)| Self::to_session(user_id, row))
            .collect::<Result<Vec<_>>>()?;
        sessions.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathwise_core::dialog::SLOT_EMAIL;

    #[tokio::test]
    async fn test_get_absent_returns_fresh() {
        let store = InMemoryDialogSessionStore::new();
        let session = store.get("alice").await.unwrap();
        assert_eq!(session.phase, Phase::New);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let store = InMemoryDialogSessionStore::new();
        store
            .set("alice", Phase::WaitingEmail, DialogSession::slots([SLOT_EMAIL]))
            .await
            .unwrap();

        let session = store.get("alice").await.unwrap();
        assert_eq!(session.phase, Phase::WaitingEmail);
        assert!(session.missing_slots.contains(SLOT_EMAIL));
    }

    #[tokio::test]
    async fn test_clear() {
        let store = InMemoryDialogSessionStore::new();
        store.set("alice", Phase::Done, BTreeSet::new()).await.unwrap();
        store.clear("alice").await.unwrap();
        store.clear("nobody").await.unwrap();
        assert_eq!(store.get("alice").await.unwrap().phase, Phase::New);
    }

    #[tokio::test]
    async fn test_unknown_phase_is_corruption() {
        let store = InMemoryDialogSessionStore::new();
        store.insert_raw("mallory", "LIMBO", BTreeSet::new()).await;

        let err = store.get("mallory").await.unwrap_err();
        assert!(err.is_state_corruption());
        assert!(store.list().await.is_err());
    }

    #[tokio::test]
    async fn test_concurrent_users() {
        let store = InMemoryDialogSessionStore::new();
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .set(&format!("user-{}", i), Phase::WaitingGoal, BTreeSet::new())
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let sessions = store.list().await.unwrap();
        assert_eq!(sessions.len(), 16);
        assert!(sessions.iter().all(|s| s.phase == Phase::WaitingGoal));
    }
}
