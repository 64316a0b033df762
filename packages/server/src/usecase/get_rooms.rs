//! UseCase: ルーム一覧・ルーム詳細の取得（HTTP API 用）
//!
//! 読み取り専用。ルームの状態は変更しない。

use std::sync::Arc;

use crate::domain::{Room, RoomId, RoomRepository};

use super::error::RoomCommandError;

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 作成日時順（同時刻なら ID 順）のルーム一覧
    pub async fn execute(&self) -> Vec<Room> {
        let mut rooms = self.repository.find_all().await;
        rooms.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        rooms
    }
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, room_id: RoomId) -> Result<Room, RoomCommandError> {
        self.repository
            .find(&room_id)
            .await
            .ok_or_else(|| RoomCommandError::RoomNotFound(room_id.to_string()))
    }
}
