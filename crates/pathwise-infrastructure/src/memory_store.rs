//! In-memory memory service.

use async_trait::async_trait;
use chrono::Utc;
use pathwise_core::error::Result;
use pathwise_core::memory::{MemoryRecord, MemoryService, MemoryStats, NewMemory};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Keeps memories in insertion order for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMemoryService {
    records: Arc<RwLock<Vec<MemoryRecord>>>,
}

impl InMemoryMemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every memory stored for the user, oldest first.
    pub async fn all_for(&self, user_id: &str) -> Vec<MemoryRecord> {
        let records = self.records.read().await;
        records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl MemoryService for InMemoryMemoryService {
    async fn store(&self, memory: NewMemory) -> Result<String> {
        memory.validate()?;

        let record = MemoryRecord {
            id: Uuid::new_v4().to_string(),
            user_id: memory.user_id,
            content: memory.content,
            memory_type: memory.memory_type,
            importance: memory.importance,
            timestamp: Utc::now(),
        };
        let id = record.id.clone();

        tracing::debug!(
            target: "pathwise::memory",
            user_id = %record.user_id,
            memory_type = %record.memory_type,
            importance = record.importance,
            "Memory stored"
        );

        self.records.write().await.push(record);
        Ok(id)
    }

    async fn retrieve(&self, user_id: &str, limit: usize) -> Result<Vec<MemoryRecord>> {
        let mut memories = self.all_for(user_id).await;
        // Stable sort keeps insertion order among equal importances
        memories.sort_by(|a, b| b.importance.total_cmp(&a.importance));
        memories.truncate(limit);
        Ok(memories)
    }

    async fn stats(&self, user_id: &str) -> Result<MemoryStats> {
        let memories = self.all_for(user_id).await;
        Ok(MemoryStats::from_records(&memories))
    }
}
