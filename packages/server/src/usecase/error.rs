//! UseCase 層のエラー定義
//!
//! いずれのエラーも送信者には通知されず、Coordinator がログに記録して破棄する。

use thiserror::Error;

use crate::domain::{DomainError, RepositoryError};

/// ルームに対するコマンドの実行エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomCommandError {
    /// 参照したルームが存在しない
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    /// leave の対象がルームに参加していない
    #[error("user '{user_id}' is not in room '{room_id}'")]
    ParticipantNotFound { room_id: String, user_id: String },

    /// 容量制限などのドメイン不変条件違反
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
