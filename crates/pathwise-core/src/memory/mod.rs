//! Memory storage for facts gathered during the dialog.
//!
//! This module provides the trait the orchestrator stores emails and goals
//! through, plus the record types shared by every backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{AsRefStr, Display, EnumString};

use crate::error::{PathwiseError, Result};

/// Default number of records returned by a retrieval.
pub const DEFAULT_RETRIEVE_LIMIT: usize = 5;

/// Category of a stored memory.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MemoryType {
    Email,
    Goal,
    Skill,
    Note,
}

/// A memory to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMemory {
    pub user_id: String,
    pub content: String,
    pub memory_type: MemoryType,
    /// In `[0, 1]`
    #[serde(default = "default_importance")]
    pub importance: f64,
}

fn default_importance() -> f64 {
    0.5
}

impl NewMemory {
    pub fn new(
        user_id: impl Into<String>,
        content: impl Into<String>,
        memory_type: MemoryType,
        importance: f64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            content: content.into(),
            memory_type,
            importance,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(PathwiseError::invalid_input("user_id must not be empty"));
        }
        if !(0.0..=1.0).contains(&self.importance) {
            return Err(PathwiseError::invalid_input(format!(
                "importance must be within [0, 1], got {}",
                self.importance
            )));
        }
        Ok(())
    }
}

/// A stored memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub memory_type: MemoryType,
    pub importance: f64,
    pub timestamp: DateTime<Utc>,
}

/// Per-user memory summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total: usize,
    pub by_type: BTreeMap<MemoryType, usize>,
    /// 0.0 when the user has no memories
    pub avg_importance: f64,
}

impl MemoryStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a MemoryRecord>) -> Self {
        let mut total = 0;
        let mut importance_sum = 0.0;
        let mut by_type = BTreeMap::new();

        for record in records {
            total += 1;
            importance_sum += record.importance;
            *by_type.entry(record.memory_type).or_insert(0) += 1;
        }

        Self {
            total,
            by_type,
            avg_importance: importance_sum / total.max(1) as f64,
        }
    }
}

/// Stores and recalls user memories.
#[async_trait]
pub trait MemoryService: Send + Sync {
    /// Stores a memory and returns its id.
    async fn store(&self, memory: NewMemory) -> Result<String>;

    /// Returns up to `limit` of the user's memories, most important first.
    async fn retrieve(&self, user_id: &str, limit: usize) -> Result<Vec<MemoryRecord>>;

    /// Summarizes the user's memories.
    async fn stats(&self, user_id: &str) -> Result<MemoryStats>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(memory_type: MemoryType, importance: f64) -> MemoryRecord {
        MemoryRecord {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: "gina".to_string(),
            content: "c".to_string(),
            memory_type,
            importance,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_importance_bounds() {
        assert!(NewMemory::new("gina", "x", MemoryType::Goal, 1.0).validate().is_ok());
        assert!(NewMemory::new("gina", "x", MemoryType::Goal, 1.5).validate().is_err());
        assert!(NewMemory::new(" ", "x", MemoryType::Goal, 0.5).validate().is_err());
    }

    #[test]
    fn test_stats() {
        let records = vec![
            record(MemoryType::Email, 1.0),
            record(MemoryType::Goal, 0.9),
            record(MemoryType::Goal, 0.5),
        ];
        let stats = MemoryStats::from_records(&records);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_type.get(&MemoryType::Goal), Some(&2));
        assert!((stats.avg_importance - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_empty_stats() {
        let stats = MemoryStats::from_records(std::iter::empty());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.avg_importance, 0.0);
    }

    #[test]
    fn test_memory_type_wire_form() {
        let memory: NewMemory = serde_json::from_str(
            r#"{"user_id": "gina", "content": "a@b.com", "memory_type": "email", "importance": 1.0}"#,
        )
        .unwrap();
        assert_eq!(memory.memory_type, MemoryType::Email);
    }
}
