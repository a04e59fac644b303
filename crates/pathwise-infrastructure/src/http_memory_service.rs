//! Memory service backed by a remote HTTP memory API.

use async_trait::async_trait;
use pathwise_core::error::Result;
use pathwise_core::memory::{MemoryRecord, MemoryService, MemoryStats, NewMemory};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::http_support::Endpoint;

const COLLABORATOR: &str = "memory";

/// Talks to a memory API exposing `/memory/store`, `/memory/retrieve` and
/// `/memory/stats/{user_id}`.
#[derive(Debug, Clone)]
pub struct HttpMemoryService {
    endpoint: Endpoint,
}

#[derive(Debug, Deserialize)]
struct StoreResponse {
    memory_id: String,
}

#[derive(Debug, Serialize)]
struct RetrieveRequest<'a> {
    user_id: &'a str,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct RetrieveResponse {
    memories: Vec<MemoryRecord>,
}

impl HttpMemoryService {
    pub fn new(base_url: impl Into<String>) -> Self {
        tracing::info!(target: "pathwise::collaborator", "Using remote memory service");
        Self {
            endpoint: Endpoint::new(COLLABORATOR, base_url),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.endpoint = self.endpoint.with_timeout(timeout);
        self
    }
}

#[async_trait]
impl MemoryService for HttpMemoryService {
    async fn store(&self, memory: NewMemory) -> Result<String> {
        memory.validate()?;
        let request = self
            .endpoint
            .client
            .post(self.endpoint.url("/memory/store"))
            .json(&memory);
        let response: StoreResponse = self.endpoint.send_json(request).await?;
        Ok(response.memory_id)
    }

    async fn retrieve(&self, user_id: &str, limit: usize) -> Result<Vec<MemoryRecord>> {
        let request = self
            .endpoint
            .client
            .post(self.endpoint.url("/memory/retrieve"))
            .json(&RetrieveRequest { user_id, limit });
        let response: RetrieveResponse = self.endpoint.send_json(request).await?;
        // The remote side may apply its own cap
        Ok(response.memories.into_iter().take(limit).collect())
    }

    async fn stats(&self, user_id: &str) -> Result<MemoryStats> {
        let request = self
            .endpoint
            .client
            .get(self.endpoint.url(&format!("/memory/stats/{}", user_id)));
        self.endpoint.send_json(request).await
    }
}
