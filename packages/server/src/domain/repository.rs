//! Repository trait 定義
//!
//! ドメイン層が必要とするルームレジストリのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{RepositoryError, Room, RoomId, Timestamp, UserId, Username};

/// Room Repository trait（ルームレジストリ）
///
/// room id → Room の対応表。ルームは最初の join で作成され、最後の参加者が抜けた時点で削除される。
/// TTL・永続化はなく、プロセスの寿命と同じだけ存在する。
///
/// 返される `Room` はスナップショット（複製）なので、変更は `save` で書き戻す。
/// 複数の操作をまたぐ一貫性は呼び出し側（Coordinator のディスパッチロック）が保証する。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// ルームを取得し、存在しなければ空のルームを作成して登録する
    ///
    /// 最初に作成した呼び出し元が作成者（`creator_id`）になる。
    async fn get_or_create(
        &self,
        room_id: RoomId,
        creator_id: UserId,
        creator_username: Username,
        created_at: Timestamp,
    ) -> Room;

    /// ルームを取得
    async fn find(&self, room_id: &RoomId) -> Option<Room>;

    /// 変更したルームを書き戻す（登録されていないルームはエラー）
    async fn save(&self, room: Room) -> Result<(), RepositoryError>;

    /// ルームを削除（存在しない場合は何もしない）
    async fn remove(&self, room_id: &RoomId);

    /// 全ルームを取得（順序は不定）
    async fn find_all(&self) -> Vec<Room>;

    /// ルーム数を取得
    async fn count(&self) -> usize;
}
