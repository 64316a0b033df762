//! Room Coordinator
//!
//! 接続から届いたコマンドを対応するユースケースに振り分ける。
//!
//! すべてのコマンドと切断時の掃除は 1 つのディスパッチロックの下で最後まで実行される。
//! 検証・状態更新・ブロードキャストの間に別のコマンドが割り込むことはない。
//! ブロードキャストはチャンネルへの積み込みだけなので、ロック中にネットワーク I/O は待たない。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RoomCoordinator::dispatch() / close_connection()
//!
//! ### なぜこのテストが必要か
//! - 複数の参加者が同じルームを操作したときに、全員が同じ順序で同じイベントを受け取ることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 人の参加者による join → play → chat → 切断 の一連の流れ
//! - エッジケース：未知のコマンド、ブロードキャスト待ち中の呼び出し側キャンセル
//! - 異常系：存在しないルームへのコマンド（何も送信されない）

use std::sync::Arc;

use listening_room_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, MessagePusher, Participant, PusherChannel, RoomCommand, RoomRepository,
};

use super::{
    add_track::AddTrackUseCase, connect_participant::ConnectParticipantUseCase,
    control_playback::ControlPlaybackUseCase,
    disconnect_participant::DisconnectParticipantUseCase, error::RoomCommandError,
    join_room::JoinRoomUseCase, leave_room::LeaveRoomUseCase, send_chat::SendChatUseCase,
};

/// ルームに対するコマンドの振り分け役
pub struct RoomCoordinator {
    connect_participant_usecase: ConnectParticipantUseCase,
    disconnect_participant_usecase: DisconnectParticipantUseCase,
    join_room_usecase: JoinRoomUseCase,
    leave_room_usecase: LeaveRoomUseCase,
    send_chat_usecase: SendChatUseCase,
    control_playback_usecase: ControlPlaybackUseCase,
    add_track_usecase: AddTrackUseCase,
    /// コマンド単位の排他制御
    dispatch_lock: Mutex<()>,
}

impl RoomCoordinator {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            connect_participant_usecase: ConnectParticipantUseCase::new(message_pusher.clone()),
            disconnect_participant_usecase: DisconnectParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            ),
            join_room_usecase: JoinRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            ),
            leave_room_usecase: LeaveRoomUseCase::new(repository.clone(), message_pusher.clone()),
            send_chat_usecase: SendChatUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock,
            ),
            control_playback_usecase: ControlPlaybackUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            ),
            add_track_usecase: AddTrackUseCase::new(repository, message_pusher),
            dispatch_lock: Mutex::new(()),
        }
    }

    /// 新しい接続を登録して接続 ID を払い出す
    pub async fn open_connection(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = self.connect_participant_usecase.execute(sender).await;
        tracing::info!("Connection '{}' opened", connection_id);
        connection_id
    }

    /// コマンドを実行する
    ///
    /// コマンドは専用のタスクで最後まで実行される。呼び出し側がキャンセルされても、
    /// 保存済みの状態変更のブロードキャストは必ず行われる。
    /// 失敗は送信者に通知せず、ログに記録するだけ。
    pub async fn dispatch(self: &Arc<Self>, connection_id: ConnectionId, command: RoomCommand) {
        let kind = command.kind();
        let coordinator = Arc::clone(self);
        let task =
            tokio::spawn(async move { coordinator.execute_command(connection_id, command).await });

        if let Err(e) = task.await {
            tracing::error!("'{}' from '{}' did not complete: {}", kind, connection_id, e);
        }
    }

    async fn execute_command(&self, connection_id: ConnectionId, command: RoomCommand) {
        let kind = command.kind();
        let _guard = self.dispatch_lock.lock().await;

        let result = match command {
            RoomCommand::Join {
                room_id,
                user_id,
                username,
            } => self
                .join_room_usecase
                .execute(connection_id, room_id, user_id, username)
                .await
                .map(|room| {
                    tracing::info!(
                        "Connection '{}' joined room '{}' ({} participants)",
                        connection_id,
                        room.id,
                        room.participants.len()
                    );
                }),
            RoomCommand::Leave { room_id, user_id } => self
                .leave_room_usecase
                .execute(room_id.clone(), user_id)
                .await
                .map(|outcome| {
                    tracing::info!(
                        "User '{}' left room '{}'",
                        outcome.participant.user_id,
                        room_id
                    );
                }),
            RoomCommand::Chat {
                room_id,
                user_id,
                username,
                message,
            } => self
                .send_chat_usecase
                .execute(room_id, user_id, username, message)
                .await
                .map(|delivered| {
                    tracing::debug!("Chat delivered to {} connections", delivered);
                }),
            RoomCommand::Play {
                room_id,
                track,
                current_time,
            } => self
                .control_playback_usecase
                .play(room_id, track, current_time)
                .await
                .map(drop),
            RoomCommand::Pause {
                room_id,
                current_time,
            } => self
                .control_playback_usecase
                .pause(room_id, current_time)
                .await
                .map(drop),
            RoomCommand::Seek {
                room_id,
                current_time,
            } => self
                .control_playback_usecase
                .seek(room_id, current_time)
                .await
                .map(drop),
            RoomCommand::AddTrack { room_id, track } => self
                .add_track_usecase
                .execute(room_id, track)
                .await
                .map(drop),
            RoomCommand::Unknown => {
                tracing::debug!("Ignoring unknown message from '{}'", connection_id);
                Ok(())
            }
        };

        match result {
            Ok(()) => {}
            Err(e @ RoomCommandError::Domain(_)) | Err(e @ RoomCommandError::Repository(_)) => {
                tracing::warn!("'{}' from '{}' rejected: {}", kind, connection_id, e);
            }
            Err(e) => {
                tracing::debug!("'{}' from '{}' ignored: {}", kind, connection_id, e);
            }
        }
    }

    /// 接続の終了処理（参加していた全ルームからの退出）
    pub async fn close_connection(&self, connection_id: &ConnectionId) -> Vec<Participant> {
        let _guard = self.dispatch_lock.lock().await;
        let evicted = self
            .disconnect_participant_usecase
            .execute(connection_id)
            .await;
        tracing::info!(
            "Connection '{}' closed ({} participants evicted)",
            connection_id,
            evicted.len()
        );
        evicted
    }
}
