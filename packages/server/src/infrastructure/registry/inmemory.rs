//! InMemory Connection Registry 実装
//!
//! ドメイン層が定義する ConnectionRegistry trait の具体的な実装。
//! `RwLock<HashMap>` をインメモリの参照表として使用します。
//!
//! - 挿入・削除は write ロックで直列化
//! - snapshot は read ロックで取得するため、snapshot 同士は並行に実行できる

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    ConnectionRegistry, Participant, ParticipantHandle, ParticipantId, RegistryError,
};

/// インメモリ Connection Registry 実装
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    /// Key: 参加者 ID, Value: 参加者ハンドル（非所有の参照）
    connections: RwLock<HashMap<ParticipantId, Arc<ParticipantHandle>>>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(&self, handle: Arc<ParticipantHandle>) -> Result<(), RegistryError> {
        let mut connections = self.connections.write().await;
        if connections.contains_key(handle.id()) {
            return Err(RegistryError::AlreadyExists(handle.id().to_string()));
        }
        let id = handle.id().clone();
        connections.insert(id.clone(), handle);
        tracing::info!(
            "Registered participant '{}', total participants: {}",
            id,
            connections.len()
        );
        Ok(())
    }

    async fn unregister(
        &self,
        id: &ParticipantId,
    ) -> Result<Arc<ParticipantHandle>, RegistryError> {
        let mut connections = self.connections.write().await;
        let handle = connections
            .remove(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        tracing::info!(
            "Unregistered participant '{}', total participants: {}",
            id,
            connections.len()
        );
        Ok(handle)
    }

    async fn snapshot(&self) -> Vec<Arc<ParticipantHandle>> {
        let connections = self.connections.read().await;
        connections.values().cloned().collect()
    }

    async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    async fn participants(&self) -> Vec<Participant> {
        let connections = self.connections.read().await;
        let mut participants: Vec<Participant> = connections
            .values()
            .map(|handle| handle.participant())
            .collect();

        // Sort by participant id for consistent ordering
        participants.sort_by(|a, b| a.id.cmp(&b.id));
        participants
    }
}
