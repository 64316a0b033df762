//! MessagePusher trait 定義
//!
//! クライアントへのイベント送信（ファンアウト）のインターフェース。
//! 送信チャンネルの所有者はこの trait の実装であり、Room は `ConnectionId` で参照するだけ。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, RoomEvent};

/// 1 接続ぶんの送信チャンネル（シリアライズ済みの JSON を運ぶ）
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除
    async fn unregister_connection(&self, connection_id: &ConnectionId);

    /// 特定の接続にイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &RoomEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続にイベントを送信し、実際に届けた件数を返す
    ///
    /// 閉じている・登録解除済みの接続はスキップし、エラーにはしない。
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &RoomEvent,
    ) -> Result<usize, MessagePushError>;
}
