//! UseCase: 接続の終了処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 切断した接続に紐づく参加者の一掃（全ルームが対象）
//!
//! ### なぜこのテストが必要か
//! - leave を送らずに切断した参加者がルームに残り続けないことを保証
//! - 同じ user_id で再参加した新しい接続が、古い接続の切断で消されないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：切断による退出と残りの参加者への通知
//! - エッジケース：最後の参加者の切断（ルーム削除）、複数ルームに参加していた接続
//! - 異常系：どのルームにも参加していない接続の切断

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, Participant, RoomEvent, RoomRepository};

/// 接続終了のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 接続終了を実行
    ///
    /// 1. 送信チャンネルの登録を解除（以降この接続には何も送らない）
    /// 2. 全ルームからこの接続の参加者を削除
    /// 3. 空になったルームは削除、それ以外は残りの参加者に leave を送信
    ///
    /// # Returns
    ///
    /// * `Vec<Participant>` - 削除された参加者
    pub async fn execute(&self, connection_id: &ConnectionId) -> Vec<Participant> {
        self.message_pusher
            .unregister_connection(connection_id)
            .await;

        let mut evicted_all = Vec::new();
        for mut room in self.repository.find_all().await {
            let evicted = room.remove_connection(connection_id);
            if evicted.is_empty() {
                continue;
            }

            if room.is_empty() {
                self.repository.remove(&room.id).await;
            } else {
                if let Err(e) = self.repository.save(room.clone()).await {
                    tracing::warn!("Failed to save room '{}' after disconnect: {}", room.id, e);
                    continue;
                }
                for participant in &evicted {
                    let left = RoomEvent::Left {
                        user_id: participant.user_id.clone(),
                        username: participant.username.clone(),
                    };
                    if let Err(e) = self
                        .message_pusher
                        .broadcast(room.connection_ids(), &left)
                        .await
                    {
                        tracing::warn!("Failed to broadcast leave in room '{}': {}", room.id, e);
                    }
                }
            }

            for participant in &evicted {
                tracing::info!(
                    "User '{}' left room '{}' by disconnecting",
                    participant.user_id,
                    room.id
                );
            }
            evicted_all.extend(evicted);
        }

        evicted_all
    }
}
