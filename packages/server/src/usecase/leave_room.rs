//! UseCase: ルーム退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - 参加者の削除、最後の参加者が抜けたときのルーム削除
//!
//! ### なぜこのテストが必要か
//! - 「参加者が 1 人以上いる間だけルームが存在する」という不変条件を保証
//! - 残った参加者にだけ leave が届くことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の退出と通知
//! - エッジケース：最後の参加者の退出（ルーム削除、通知なし）
//! - 異常系：存在しないルーム・参加者の退出

use std::sync::Arc;

use crate::domain::{MessagePusher, Participant, RoomEvent, RoomId, RoomRepository, UserId};

use super::error::RoomCommandError;

/// 退出の結果
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveOutcome {
    /// 退出した参加者
    pub participant: Participant,
    /// 最後の参加者だったためルームが削除されたか
    pub room_deleted: bool,
}

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// ルーム退出を実行
    ///
    /// ルームが空になった場合は削除し、通知相手がいないので leave は送信しない。
    pub async fn execute(
        &self,
        room_id: RoomId,
        user_id: UserId,
    ) -> Result<LeaveOutcome, RoomCommandError> {
        let mut room = self
            .repository
            .find(&room_id)
            .await
            .ok_or_else(|| RoomCommandError::RoomNotFound(room_id.to_string()))?;

        let participant = room.remove_participant(&user_id).ok_or_else(|| {
            RoomCommandError::ParticipantNotFound {
                room_id: room_id.to_string(),
                user_id: user_id.to_string(),
            }
        })?;

        if room.is_empty() {
            self.repository.remove(&room_id).await;
            return Ok(LeaveOutcome {
                participant,
                room_deleted: true,
            });
        }

        self.repository.save(room.clone()).await?;

        let left = RoomEvent::Left {
            user_id: participant.user_id.clone(),
            username: participant.username.clone(),
        };
        if let Err(e) = self
            .message_pusher
            .broadcast(room.connection_ids(), &left)
            .await
        {
            tracing::warn!("Failed to broadcast leave in room '{}': {}", room_id, e);
        }

        Ok(LeaveOutcome {
            participant,
            room_deleted: false,
        })
    }
}
