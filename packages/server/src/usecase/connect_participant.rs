//! UseCase: 接続の開始処理
//!
//! 接続した時点ではどのルームにも属さない。ルームへの参加は join コマンドで行う。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

/// 接続開始のユースケース
pub struct ConnectParticipantUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 接続 ID を払い出し、送信チャンネルを登録する
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        self.message_pusher
            .register_connection(connection_id, sender)
            .await;
        connection_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::RoomEvent, infrastructure::message_pusher::WebSocketMessagePusher};
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_connect_registers_fresh_connection() {
        // テスト項目: 接続ごとに異なる ID が払い出され、登録したチャンネルに届く
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = ConnectParticipantUseCase::new(pusher.clone());
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        // when (操作):
        let first = usecase.execute(tx1).await;
        let second = usecase.execute(tx2).await;

        // then (期待する結果):
        assert_ne!(first, second);
        assert_eq!(pusher.connection_count().await, 2);
        pusher
            .push_to(
                &first,
                &RoomEvent::Paused {
                    current_time: crate::domain::PlaybackPosition::ZERO,
                },
            )
            .await
            .unwrap();
        assert_eq!(
            rx1.try_recv().unwrap(),
            r#"{"type":"pause","currentTime":0.0}"#
        );
    }
}
