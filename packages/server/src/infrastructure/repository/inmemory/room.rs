//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリのルームレジストリとして使用します。
//! プロセスを再起動するとすべてのルームが失われます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    RepositoryError, Room, RoomId, RoomLimits, RoomRepository, Timestamp, UserId, Username,
};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// room id → Room
    rooms: Arc<Mutex<HashMap<RoomId, Room>>>,
    /// 新規作成するルームに適用する容量制限
    limits: RoomLimits,
}

impl InMemoryRoomRepository {
    /// 容量制限なしの空のレジストリを作成
    pub fn new() -> Self {
        Self::with_limits(RoomLimits::unbounded())
    }

    /// 容量制限付きの空のレジストリを作成
    pub fn with_limits(limits: RoomLimits) -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            limits,
        }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn get_or_create(
        &self,
        room_id: RoomId,
        creator_id: UserId,
        creator_username: Username,
        created_at: Timestamp,
    ) -> Room {
        let mut rooms = self.rooms.lock().await;
        rooms
            .entry(room_id.clone())
            .or_insert_with(|| {
                tracing::info!("Room '{}' created by '{}'", room_id, creator_id);
                Room::with_limits(
                    room_id,
                    creator_id,
                    &creator_username,
                    created_at,
                    self.limits,
                )
            })
            .clone()
    }

    async fn find(&self, room_id: &RoomId) -> Option<Room> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).cloned()
    }

    async fn save(&self, room: Room) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        match rooms.get_mut(&room.id) {
            Some(stored) => {
                *stored = room;
                Ok(())
            }
            None => Err(RepositoryError::RoomNotFound(room.id.into_string())),
        }
    }

    async fn remove(&self, room_id: &RoomId) {
        let mut rooms = self.rooms.lock().await;
        if rooms.remove(room_id).is_some() {
            tracing::info!("Room '{}' deleted", room_id);
        }
    }

    async fn find_all(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        rooms.values().cloned().collect()
    }

    async fn count(&self) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, Participant, PlaybackPosition};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - get_or_create: 初回作成と既存ルームの取得
    // - save / find: 変更の書き戻し
    // - remove: 削除と存在しないルームの削除（冪等性）
    //
    // 【なぜこのテストが必要か】
    // - レジストリはルームのライフサイクル（作成・削除）の唯一の記録
    // - 「参加者が 1 人以上いる間だけルームが存在する」という不変条件の土台になる
    // ========================================

    fn room_id(value: &str) -> RoomId {
        RoomId::new(value.to_string()).unwrap()
    }

    fn user_id(value: &str) -> UserId {
        UserId::new(value.to_string()).unwrap()
    }

    fn username(value: &str) -> Username {
        Username::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_get_or_create_creates_room_once() {
        // テスト項目: 初回は作成し、2 回目以降は既存ルームを返す（作成者は最初の呼び出し元）
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let first = repo
            .get_or_create(room_id("r1"), user_id("u1"), username("Alice"), Timestamp::new(1000))
            .await;
        let second = repo
            .get_or_create(room_id("r1"), user_id("u2"), username("Bob"), Timestamp::new(2000))
            .await;

        // then (期待する結果):
        assert_eq!(repo.count().await, 1);
        assert_eq!(first.name, "Alice's Room");
        assert_eq!(second.creator_id, user_id("u1"));
        assert_eq!(second.created_at, Timestamp::new(1000));
    }

    #[tokio::test]
    async fn test_get_or_create_applies_limits() {
        // テスト項目: レジストリの容量制限が新規ルームに適用される
        // given (前提条件):
        let limits = RoomLimits {
            max_participants: Some(4),
            max_queue_length: Some(10),
        };
        let repo = InMemoryRoomRepository::with_limits(limits);

        // when (操作):
        let room = repo
            .get_or_create(room_id("r1"), user_id("u1"), username("Alice"), Timestamp::new(1000))
            .await;

        // then (期待する結果):
        assert_eq!(room.limits, limits);
    }

    #[tokio::test]
    async fn test_save_persists_changes() {
        // テスト項目: save した変更が find で取得できる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let mut room = repo
            .get_or_create(room_id("r1"), user_id("u1"), username("Alice"), Timestamp::new(1000))
            .await;
        room.add_participant(Participant::new(
            user_id("u1"),
            username("Alice"),
            ConnectionId::generate(),
            Timestamp::new(1000),
        ))
        .unwrap();
        room.play(None, Some(PlaybackPosition::new(3000.0).unwrap()));

        // when (操作):
        let result = repo.save(room.clone()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(repo.find(&room_id("r1")).await, Some(room));
    }

    #[tokio::test]
    async fn test_save_unknown_room_fails() {
        // テスト項目: 登録されていないルームの save はエラーになる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let room = Room::new(
            room_id("ghost"),
            user_id("u1"),
            &username("Alice"),
            Timestamp::new(1000),
        );

        // when (操作):
        let result = repo.save(room).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::RoomNotFound("ghost".to_string()))
        );
        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn test_remove_room_and_nonexistent_room() {
        // テスト項目: ルームを削除でき、存在しないルームの削除も問題なく処理される（冪等性）
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        repo.get_or_create(room_id("r1"), user_id("u1"), username("Alice"), Timestamp::new(1000))
            .await;

        // when (操作):
        repo.remove(&room_id("r1")).await;
        repo.remove(&room_id("r1")).await;
        repo.remove(&room_id("nonexistent")).await;

        // then (期待する結果):
        assert_eq!(repo.count().await, 0);
        assert!(repo.find(&room_id("r1")).await.is_none());
    }

    #[tokio::test]
    async fn test_find_all_returns_every_room() {
        // テスト項目: 登録されている全ルームを取得できる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        for id in ["r1", "r2", "r3"] {
            repo.get_or_create(room_id(id), user_id("u1"), username("Alice"), Timestamp::new(1000))
                .await;
        }

        // when (操作):
        let mut ids: Vec<String> = repo
            .find_all()
            .await
            .into_iter()
            .map(|room| room.id.into_string())
            .collect();
        ids.sort();

        // then (期待する結果):
        assert_eq!(ids, vec!["r1", "r2", "r3"]);
    }
}
