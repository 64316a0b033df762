//! UseCase: キューへのトラック追加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AddTrackUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - キューは追記のみで、追加順を保ち重複も除去しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：追加とブロードキャスト
//! - エッジケース：同じトラックの重複追加
//! - 異常系：キューの上限超過

use std::sync::Arc;

use crate::domain::{MediaItem, MessagePusher, RoomEvent, RoomId, RoomRepository};

use super::error::RoomCommandError;

/// トラック追加のユースケース
pub struct AddTrackUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl AddTrackUseCase {
    /// 新しい AddTrackUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// トラック追加を実行
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 追加後のキューの長さ
    /// * `Err(RoomCommandError)` - ルームが存在しない、またはキューが上限に達している
    pub async fn execute(
        &self,
        room_id: RoomId,
        track: MediaItem,
    ) -> Result<usize, RoomCommandError> {
        let mut room = self
            .repository
            .find(&room_id)
            .await
            .ok_or_else(|| RoomCommandError::RoomNotFound(room_id.to_string()))?;

        room.add_track(track.clone())?;
        self.repository.save(room.clone()).await?;

        if let Err(e) = self
            .message_pusher
            .broadcast(room.connection_ids(), &RoomEvent::TrackAdded { track })
            .await
        {
            tracing::warn!("Failed to broadcast add_track in room '{}': {}", room_id, e);
        }

        Ok(room.queue.len())
    }
}
