//! UseCase: 再生操作（play / pause / seek）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ControlPlaybackUseCase の play() / pause() / seek() メソッド
//! - 仮想再生ヘッド（is_playing と current_time）の更新とブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 状態遷移はすべて後勝ち。連続した play がそれぞれの時点の状態でブロードキャストされることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：play / pause / seek
//! - エッジケース：位置指定なしの play・pause、位置 0 の seek
//! - 異常系：削除済みのルームへの操作（何も送信されない）

use std::sync::Arc;

use crate::domain::{
    MediaItem, MessagePusher, PlaybackPosition, Room, RoomEvent, RoomId, RoomRepository,
};

use super::error::RoomCommandError;

/// 再生操作のユースケース
pub struct ControlPlaybackUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ControlPlaybackUseCase {
    /// 新しい ControlPlaybackUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 再生開始（トラック指定があれば差し替え、位置指定がなければ 0 から）
    pub async fn play(
        &self,
        room_id: RoomId,
        track: Option<MediaItem>,
        current_time: Option<PlaybackPosition>,
    ) -> Result<Room, RoomCommandError> {
        self.apply(room_id, |room| {
            room.play(track, current_time);
            RoomEvent::Played {
                current_track: room.current_track.clone(),
                current_time: room.current_time,
            }
        })
        .await
    }

    /// 一時停止（位置指定がなければ現在の位置を維持）
    pub async fn pause(
        &self,
        room_id: RoomId,
        current_time: Option<PlaybackPosition>,
    ) -> Result<Room, RoomCommandError> {
        self.apply(room_id, |room| {
            room.pause(current_time);
            RoomEvent::Paused {
                current_time: room.current_time,
            }
        })
        .await
    }

    /// 再生位置の変更
    pub async fn seek(
        &self,
        room_id: RoomId,
        current_time: PlaybackPosition,
    ) -> Result<Room, RoomCommandError> {
        self.apply(room_id, |room| {
            room.seek(current_time);
            RoomEvent::Seeked { current_time }
        })
        .await
    }

    /// ルームを取得して変更を適用し、書き戻してからルーム全体にイベントを送信する
    async fn apply<F>(&self, room_id: RoomId, transition: F) -> Result<Room, RoomCommandError>
    where
        F: FnOnce(&mut Room) -> RoomEvent,
    {
        let mut room = self
            .repository
            .find(&room_id)
            .await
            .ok_or_else(|| RoomCommandError::RoomNotFound(room_id.to_string()))?;

        let event = transition(&mut room);
        self.repository.save(room.clone()).await?;

        if let Err(e) = self
            .message_pusher
            .broadcast(room.connection_ids(), &event)
            .await
        {
            tracing::warn!("Failed to broadcast playback change in room '{}': {}", room_id, e);
        }

        Ok(room)
    }
}
