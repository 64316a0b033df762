//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を `ConnectionId` をキーに所有する
//! - ドメインイベントを JSON にシリアライズし、接続へ送信する（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui::handler::websocket`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、送信にだけ使用します。
//! 送信はキューへの積み込みだけで完了し、ネットワーク I/O を待ちません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel, RoomEvent},
    infrastructure::dto::websocket::OutboundMessage,
};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中の WebSocket の送信チャンネル
    connections: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// 登録中の接続数
    pub async fn connection_count(&self) -> usize {
        self.connections.lock().await.len()
    }

    fn serialize(event: &RoomEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&OutboundMessage::from(event))
            .map_err(|e| MessagePushError::Serialization(e.to_string()))
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        connections.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_connection(&self, connection_id: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &RoomEvent,
    ) -> Result<(), MessagePushError> {
        let payload = Self::serialize(event)?;
        let connections = self.connections.lock().await;

        let sender = connections
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ConnectionNotFound(connection_id.to_string()))?;
        sender
            .send(payload)
            .map_err(|_| MessagePushError::ConnectionClosed(connection_id.to_string()))?;
        tracing::debug!("Pushed event to connection '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &RoomEvent,
    ) -> Result<usize, MessagePushError> {
        // 1 回だけシリアライズして全員に配る
        let payload = Self::serialize(event)?;
        let connections = self.connections.lock().await;

        let mut delivered = 0;
        for target in targets {
            let Some(sender) = connections.get(&target) else {
                tracing::debug!("Connection '{}' not found during broadcast, skipping", target);
                continue;
            };
            // 切断済みだがまだ掃除されていない接続はスキップ
            if sender.is_closed() {
                tracing::debug!("Connection '{}' is closed, skipping", target);
                continue;
            }
            match sender.send(payload.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => tracing::debug!("Connection '{}' closed during broadcast", target),
            }
        }

        Ok(delivered)
    }
}
