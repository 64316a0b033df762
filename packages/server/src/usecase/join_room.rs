//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 未知のルーム ID での参加によるルーム作成、既存ルームへの参加
//!
//! ### なぜこのテストが必要か
//! - 参加者にだけ届く sync_state スナップショットがルームの状態を正しく反映することを保証
//! - 同じ user_id での再参加が後勝ちで置き換わることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ルームの作成、既存ルームへの参加
//! - エッジケース：同じ user_id での再参加
//! - 異常系：参加者数の上限超過

use std::sync::Arc;

use listening_room_shared::time::Clock;

use crate::domain::{
    ConnectionId, MessagePusher, Participant, Room, RoomEvent, RoomId, RoomRepository, Timestamp,
    UserId, Username,
};

use super::error::RoomCommandError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// ルーム参加を実行
    ///
    /// 1. ルームを取得（なければ作成）
    /// 2. 参加者を追加（同じ user_id がいれば置き換え）
    /// 3. 参加した接続にだけ sync_state を送信
    /// 4. ルーム全体に join を送信
    ///
    /// # Returns
    ///
    /// * `Ok(Room)` - 参加後のルーム
    /// * `Err(RoomCommandError)` - 参加失敗（容量超過）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        user_id: UserId,
        username: Username,
    ) -> Result<Room, RoomCommandError> {
        let now = Timestamp::new(self.clock.now_millis());

        let mut room = self
            .repository
            .get_or_create(room_id.clone(), user_id.clone(), username.clone(), now)
            .await;

        let participant = Participant::new(user_id.clone(), username.clone(), connection_id, now);
        match room.add_participant(participant) {
            Ok(Some(displaced)) => {
                tracing::warn!(
                    "User '{}' re-joined room '{}' from connection '{}', replacing connection '{}'",
                    user_id,
                    room_id,
                    connection_id,
                    displaced.connection_id
                );
            }
            Ok(None) => {}
            Err(e) => {
                // 作成直後のルームが空のまま残らないようにする
                if room.is_empty() {
                    self.repository.remove(&room_id).await;
                }
                return Err(e.into());
            }
        }
        self.repository.save(room.clone()).await?;

        if let Err(e) = self
            .message_pusher
            .push_to(&connection_id, &RoomEvent::SyncState(room.clone()))
            .await
        {
            tracing::warn!("Failed to send sync_state to '{}': {}", connection_id, e);
        }

        let joined = RoomEvent::Joined { user_id, username };
        if let Err(e) = self
            .message_pusher
            .broadcast(room.connection_ids(), &joined)
            .await
        {
            tracing::warn!("Failed to broadcast join in room '{}': {}", room_id, e);
        }

        Ok(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DomainError, RoomLimits},
        usecase::test_support::{Harness, NOW, drain, room_id, user_id, username},
    };
    use serde_json::json;

    fn create_usecase(harness: &Harness) -> JoinRoomUseCase {
        JoinRoomUseCase::new(
            harness.repository(),
            harness.message_pusher(),
            harness.clock.clone(),
        )
    }

    #[tokio::test]
    async fn test_join_creates_room_on_demand() {
        // テスト項目: 未知のルーム ID で参加するとルームが作成され、初期状態の sync_state が届く
        // given (前提条件):
        let harness = Harness::new();
        let usecase = create_usecase(&harness);
        let (alice, mut alice_rx) = harness.connect().await;

        // when (操作):
        let room = usecase
            .execute(alice, room_id("r1"), user_id("u1"), username("Alice"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(room.participants.len(), 1);
        assert_eq!(room.created_at, Timestamp::new(NOW));
        assert_eq!(harness.repository.count().await, 1);

        let frames = drain(&mut alice_rx);
        assert_eq!(
            frames,
            vec![
                json!({
                    "type": "sync_state",
                    "room": {
                        "id": "r1",
                        "name": "Alice's Room",
                        "queue": [],
                        "isPlaying": false,
                        "currentTime": 0.0,
                        "participants": [{"id": "u1", "username": "Alice"}]
                    }
                }),
                json!({"type": "join", "userId": "u1", "username": "Alice"}),
            ]
        );
    }

    #[tokio::test]
    async fn test_join_existing_room_notifies_members() {
        // テスト項目: 既存ルームへの参加で、参加者に sync_state、既存メンバーに join が届く
        // given (前提条件):
        let harness = Harness::new();
        let usecase = create_usecase(&harness);
        let (alice, mut alice_rx) = harness.connect().await;
        let (bob, mut bob_rx) = harness.connect().await;
        usecase
            .execute(alice, room_id("r1"), user_id("u1"), username("Alice"))
            .await
            .unwrap();
        drain(&mut alice_rx);

        // when (操作):
        usecase
            .execute(bob, room_id("r1"), user_id("u2"), username("Bob"))
            .await
            .unwrap();

        // then (期待する結果):
        let bob_frames = drain(&mut bob_rx);
        assert_eq!(bob_frames[0]["type"], "sync_state");
        assert_eq!(
            bob_frames[0]["room"]["participants"],
            json!([{"id": "u1", "username": "Alice"}, {"id": "u2", "username": "Bob"}])
        );
        assert_eq!(
            drain(&mut alice_rx),
            vec![json!({"type": "join", "userId": "u2", "username": "Bob"})]
        );

        // 作成者は最初の参加者のまま
        let room = harness.repository.find(&room_id("r1")).await.unwrap();
        assert_eq!(room.creator_id, user_id("u1"));
    }

    #[tokio::test]
    async fn test_rejoin_with_same_user_id_replaces_connection() {
        // テスト項目: 同じ user_id で別の接続から参加すると、参加者の接続が置き換わる（後勝ち）
        // given (前提条件):
        let harness = Harness::new();
        let usecase = create_usecase(&harness);
        let (first, mut first_rx) = harness.connect().await;
        let (second, mut second_rx) = harness.connect().await;
        usecase
            .execute(first, room_id("r1"), user_id("u1"), username("Alice"))
            .await
            .unwrap();
        drain(&mut first_rx);

        // when (操作):
        let room = usecase
            .execute(second, room_id("r1"), user_id("u1"), username("Alice"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(room.participants.len(), 1);
        assert_eq!(room.participants[0].connection_id, second);
        // 置き換えられた接続には何も通知されない
        assert!(drain(&mut first_rx).is_empty());
        assert_eq!(drain(&mut second_rx).len(), 2);
    }

    #[tokio::test]
    async fn test_join_capacity_exceeded() {
        // テスト項目: 参加者数の上限を超える参加はエラーになり、何も送信されない
        // given (前提条件):
        let harness = Harness::with_limits(RoomLimits {
            max_participants: Some(1),
            max_queue_length: None,
        });
        let usecase = create_usecase(&harness);
        let (alice, _alice_rx) = harness.connect().await;
        let (bob, mut bob_rx) = harness.connect().await;
        usecase
            .execute(alice, room_id("r1"), user_id("u1"), username("Alice"))
            .await
            .unwrap();

        // when (操作):
        let result = usecase
            .execute(bob, room_id("r1"), user_id("u2"), username("Bob"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RoomCommandError::Domain(
                DomainError::ParticipantCapacityExceeded(1)
            ))
        );
        assert!(drain(&mut bob_rx).is_empty());
        let room = harness.repository.find(&room_id("r1")).await.unwrap();
        assert_eq!(room.participants.len(), 1);
    }
}
