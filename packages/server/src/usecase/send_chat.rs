//! UseCase: チャット送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendChatUseCase::execute() メソッド
//! - ルーム全体へのチャットのファンアウト（ルームの状態は変更しない）
//!
//! ### なぜこのテストが必要か
//! - 切断済みだがまだ掃除されていない参加者がいても、他の参加者に届き失敗しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信者を含む全参加者への配信
//! - エッジケース：閉じた接続が残っている場合
//! - 異常系：存在しないルームへの送信

use std::sync::Arc;

use listening_room_shared::time::Clock;

use crate::domain::{
    ChatText, MessagePusher, RoomEvent, RoomId, RoomRepository, Timestamp, UserId, Username,
};

use super::error::RoomCommandError;

/// チャット送信のユースケース
pub struct SendChatUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendChatUseCase {
    /// 新しい SendChatUseCase を作成
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

    /// チャット送信を実行
    ///
    /// 送信者がルームに参加しているかは確認しない（申告された user_id・username をそのまま使う）。
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 実際に配信した接続数
    /// * `Err(RoomCommandError)` - ルームが存在しない
    pub async fn execute(
        &self,
        room_id: RoomId,
        user_id: UserId,
        username: Username,
        message: ChatText,
    ) -> Result<usize, RoomCommandError> {
        let room = self
            .repository
            .find(&room_id)
            .await
            .ok_or_else(|| RoomCommandError::RoomNotFound(room_id.to_string()))?;

        let chat = RoomEvent::Chat {
            user_id,
            username,
            message,
            sent_at: Timestamp::new(self.clock.now_millis()),
        };
        let delivered = self
            .message_pusher
            .broadcast(room.connection_ids(), &chat)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to broadcast chat in room '{}': {}", room_id, e);
                0
            });

        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionId, MessagePushError, PusherChannel},
        usecase::{
            join_room::JoinRoomUseCase,
            test_support::{Harness, NOW, chat_text, drain, room_id, user_id, username},
        },
    };
    use async_trait::async_trait;
    use serde_json::json;

    mockall::mock! {
        Pusher {}

        #[async_trait]
        impl MessagePusher for Pusher {
            async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel);
            async fn unregister_connection(&self, connection_id: &ConnectionId);
            async fn push_to(
                &self,
                connection_id: &ConnectionId,
                event: &RoomEvent,
            ) -> Result<(), MessagePushError>;
            async fn broadcast(
                &self,
                targets: Vec<ConnectionId>,
                event: &RoomEvent,
            ) -> Result<usize, MessagePushError>;
        }
    }

    async fn join(harness: &Harness, connection_id: ConnectionId, id: &str, name: &str) {
        JoinRoomUseCase::new(
            harness.repository(),
            harness.message_pusher(),
            harness.clock.clone(),
        )
        .execute(connection_id, room_id("r1"), user_id(id), username(name))
        .await
        .unwrap();
    }

    fn create_usecase(harness: &Harness) -> SendChatUseCase {
        SendChatUseCase::new(
            harness.repository(),
            harness.message_pusher(),
            harness.clock.clone(),
        )
    }

    #[tokio::test]
    async fn test_chat_is_delivered_to_every_participant() {
        // テスト項目: チャットが送信者を含む全参加者に届く
        // given (前提条件):
        let harness = Harness::new();
        let usecase = create_usecase(&harness);
        let (alice, mut alice_rx) = harness.connect().await;
        let (bob, mut bob_rx) = harness.connect().await;
        join(&harness, alice, "u1", "Alice").await;
        join(&harness, bob, "u2", "Bob").await;
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        // when (操作):
        let delivered = usecase
            .execute(room_id("r1"), user_id("u1"), username("Alice"), chat_text("hi"))
            .await
            .unwrap();

        // then (期待する結果):
        let expected = json!({
            "type": "chat",
            "userId": "u1",
            "username": "Alice",
            "message": "hi",
            "timestamp": NOW
        });
        assert_eq!(delivered, 2);
        assert_eq!(drain(&mut alice_rx), vec![expected.clone()]);
        assert_eq!(drain(&mut bob_rx), vec![expected]);
    }

    #[tokio::test]
    async fn test_chat_skips_closed_connection_without_failing() {
        // テスト項目: leave せずに接続が閉じた参加者が残っていても、他の参加者に届きエラーにならない
        // given (前提条件):
        let harness = Harness::new();
        let usecase = create_usecase(&harness);
        let (alice, alice_rx) = harness.connect().await;
        let (bob, mut bob_rx) = harness.connect().await;
        let (carol, mut carol_rx) = harness.connect().await;
        join(&harness, alice, "u1", "Alice").await;
        join(&harness, bob, "u2", "Bob").await;
        join(&harness, carol, "u3", "Carol").await;
        drain(&mut bob_rx);
        drain(&mut carol_rx);
        drop(alice_rx);

        // when (操作):
        let result = usecase
            .execute(room_id("r1"), user_id("u2"), username("Bob"), chat_text("still here?"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(2));
        assert_eq!(drain(&mut bob_rx).len(), 1);
        assert_eq!(drain(&mut carol_rx)[0]["message"], "still here?");
        // alice の参加記録はまだ残っている
        let room = harness.repository.find(&room_id("r1")).await.unwrap();
        assert_eq!(room.participants.len(), 3);
    }

    #[tokio::test]
    async fn test_chat_to_unknown_room_broadcasts_nothing() {
        // テスト項目: 存在しないルームへのチャットはエラーになり、ブロードキャストされない
        // given (前提条件):
        let harness = Harness::new();
        let mut pusher = MockPusher::new();
        pusher.expect_broadcast().never();
        let usecase = SendChatUseCase::new(
            harness.repository(),
            Arc::new(pusher),
            harness.clock.clone(),
        );

        // when (操作):
        let result = usecase
            .execute(room_id("nope"), user_id("u1"), username("Alice"), chat_text("hi"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RoomCommandError::RoomNotFound("nope".to_string()))
        );
    }

    #[tokio::test]
    async fn test_chat_broadcasts_once_to_room_members() {
        // テスト項目: チャットはルームの参加者を対象に 1 回だけブロードキャストされる
        // given (前提条件):
        let harness = Harness::new();
        let (alice, _alice_rx) = harness.connect().await;
        join(&harness, alice, "u1", "Alice").await;

        let mut pusher = MockPusher::new();
        pusher
            .expect_broadcast()
            .times(1)
            .returning(move |targets, _| Ok(targets.len()));
        let usecase = SendChatUseCase::new(
            harness.repository(),
            Arc::new(pusher),
            harness.clock.clone(),
        );

        // when (操作):
        let result = usecase
            .execute(room_id("r1"), user_id("u1"), username("Alice"), chat_text("hi"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(1));
    }
}
