//! Entity 定義
//!
//! - `Room`: リスニングルーム（再生状態・キュー・参加者を保持する集約）
//! - `Participant`: ルームに参加している接続
//! - `RoomLimits`: ルームごとの容量制限（既定は無制限）

use super::{
    ConnectionId, DomainError, MediaItem, PlaybackPosition, RoomId, Timestamp, UserId, Username,
};

/// ルームの容量制限
///
/// `None` は無制限を表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoomLimits {
    /// 1 ルームあたりの最大参加者数
    pub max_participants: Option<usize>,
    /// キューに積める最大トラック数
    pub max_queue_length: Option<usize>,
}

impl RoomLimits {
    /// 制限なし
    pub fn unbounded() -> Self {
        Self::default()
    }
}

/// ルームの参加者
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub user_id: UserId,
    pub username: Username,
    /// 送信チャンネルへの非所有参照（チャンネル本体は MessagePusher が所有する）
    pub connection_id: ConnectionId,
    pub joined_at: Timestamp,
}

impl Participant {
    pub fn new(
        user_id: UserId,
        username: Username,
        connection_id: ConnectionId,
        joined_at: Timestamp,
    ) -> Self {
        Self {
            user_id,
            username,
            connection_id,
            joined_at,
        }
    }
}

/// リスニングルーム
///
/// `is_playing` と `current_time` で「仮想再生ヘッド」を表す。
/// `current_time` は最後に受け取ったチェックポイントで、再生中はクライアントが前方へ補間する。
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub creator_id: UserId,
    /// 参加順に並ぶ参加者（同じ user_id は 1 件のみ）
    pub participants: Vec<Participant>,
    pub queue: Vec<MediaItem>,
    pub current_track: Option<MediaItem>,
    pub is_playing: bool,
    pub current_time: PlaybackPosition,
    pub created_at: Timestamp,
    pub limits: RoomLimits,
}

impl Room {
    /// 容量制限なしの空のルームを作成
    pub fn new(
        id: RoomId,
        creator_id: UserId,
        creator_username: &Username,
        created_at: Timestamp,
    ) -> Self {
        Self::with_limits(
            id,
            creator_id,
            creator_username,
            created_at,
            RoomLimits::unbounded(),
        )
    }

    /// 容量制限付きの空のルームを作成
    pub fn with_limits(
        id: RoomId,
        creator_id: UserId,
        creator_username: &Username,
        created_at: Timestamp,
        limits: RoomLimits,
    ) -> Self {
        Self {
            id,
            name: format!("{}'s Room", creator_username.as_str()),
            creator_id,
            participants: Vec::new(),
            queue: Vec::new(),
            current_track: None,
            is_playing: false,
            current_time: PlaybackPosition::ZERO,
            created_at,
            limits,
        }
    }

    /// 参加者を追加
    ///
    /// 同じ user_id の参加者がいる場合は同じ位置で置き換え（後勝ち）、置き換えられた参加者を返す。
    pub fn add_participant(
        &mut self,
        participant: Participant,
    ) -> Result<Option<Participant>, DomainError> {
        if let Some(existing) = self
            .participants
            .iter_mut()
            .find(|p| p.user_id == participant.user_id)
        {
            return Ok(Some(std::mem::replace(existing, participant)));
        }

        if let Some(max) = self.limits.max_participants
            && self.participants.len() >= max
        {
            return Err(DomainError::ParticipantCapacityExceeded(max));
        }

        self.participants.push(participant);
        Ok(None)
    }

    /// user_id に一致する参加者を削除
    pub fn remove_participant(&mut self, user_id: &UserId) -> Option<Participant> {
        let index = self
            .participants
            .iter()
            .position(|p| &p.user_id == user_id)?;
        Some(self.participants.remove(index))
    }

    /// 指定した接続に紐づく参加者をすべて削除し、削除した参加者を返す
    pub fn remove_connection(&mut self, connection_id: &ConnectionId) -> Vec<Participant> {
        let (evicted, remaining): (Vec<_>, Vec<_>) = std::mem::take(&mut self.participants)
            .into_iter()
            .partition(|p| &p.connection_id == connection_id);
        self.participants = remaining;
        evicted
    }

    /// ブロードキャスト対象の接続 ID（参加順）
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.participants.iter().map(|p| p.connection_id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// 再生開始
    ///
    /// トラックが指定されていれば現在のトラックを差し替える。位置の指定がなければ 0 から。
    pub fn play(&mut self, track: Option<MediaItem>, position: Option<PlaybackPosition>) {
        if let Some(track) = track {
            self.current_track = Some(track);
        }
        self.is_playing = true;
        self.current_time = position.unwrap_or(PlaybackPosition::ZERO);
    }

    /// 一時停止（位置の指定がなければ現在の位置を維持）
    pub fn pause(&mut self, position: Option<PlaybackPosition>) {
        self.is_playing = false;
        if let Some(position) = position {
            self.current_time = position;
        }
    }

    pub fn seek(&mut self, position: PlaybackPosition) {
        self.current_time = position;
    }

    /// キューの末尾にトラックを追加（重複は除去しない）
    pub fn add_track(&mut self, track: MediaItem) -> Result<(), DomainError> {
        if let Some(max) = self.limits.max_queue_length
            && self.queue.len() >= max
        {
            return Err(DomainError::QueueCapacityExceeded(max));
        }
        self.queue.push(track);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn name(value: &str) -> Username {
        Username::new(value.to_string()).unwrap()
    }

    fn participant(id: &str, username: &str, connection_id: ConnectionId) -> Participant {
        Participant::new(user(id), name(username), connection_id, Timestamp::new(1000))
    }

    fn create_test_room(limits: RoomLimits) -> Room {
        Room::with_limits(
            RoomId::new("r1".to_string()).unwrap(),
            user("u1"),
            &name("Alice"),
            Timestamp::new(1000),
            limits,
        )
    }

    #[test]
    fn test_new_room_has_default_playback_state() {
        // テスト項目: 新規ルームは空・停止中・位置 0 で、名前は作成者名から決まる
        // given (前提条件):

        // when (操作):
        let room = create_test_room(RoomLimits::unbounded());

        // then (期待する結果):
        assert_eq!(room.name, "Alice's Room");
        assert_eq!(room.creator_id, user("u1"));
        assert!(room.is_empty());
        assert!(room.queue.is_empty());
        assert!(room.current_track.is_none());
        assert!(!room.is_playing);
        assert_eq!(room.current_time, PlaybackPosition::ZERO);
    }

    #[test]
    fn test_add_participant_with_same_user_id_replaces_in_place() {
        // テスト項目: 同じ user_id で参加すると元の位置のまま置き換えられる（後勝ち）
        // given (前提条件):
        let mut room = create_test_room(RoomLimits::unbounded());
        let first_connection = ConnectionId::generate();
        let second_connection = ConnectionId::generate();
        room.add_participant(participant("u1", "Alice", first_connection))
            .unwrap();
        room.add_participant(participant("u2", "Bob", ConnectionId::generate()))
            .unwrap();

        // when (操作):
        let displaced = room
            .add_participant(participant("u1", "Alice2", second_connection))
            .unwrap();

        // then (期待する結果):
        assert_eq!(displaced.unwrap().connection_id, first_connection);
        assert_eq!(room.participants.len(), 2);
        assert_eq!(room.participants[0].user_id, user("u1"));
        assert_eq!(room.participants[0].username, name("Alice2"));
        assert_eq!(room.participants[0].connection_id, second_connection);
    }

    #[test]
    fn test_add_participant_respects_capacity_but_allows_rejoin() {
        // テスト項目: 参加者数の上限を超える参加は拒否されるが、既存 user_id の再参加は許可される
        // given (前提条件):
        let mut room = create_test_room(RoomLimits {
            max_participants: Some(1),
            max_queue_length: None,
        });
        room.add_participant(participant("u1", "Alice", ConnectionId::generate()))
            .unwrap();

        // when (操作):
        let overflow = room.add_participant(participant("u2", "Bob", ConnectionId::generate()));
        let rejoin = room.add_participant(participant("u1", "Alice", ConnectionId::generate()));

        // then (期待する結果):
        assert_eq!(overflow, Err(DomainError::ParticipantCapacityExceeded(1)));
        assert!(rejoin.is_ok());
        assert_eq!(room.participants.len(), 1);
    }

    #[test]
    fn test_remove_connection_evicts_every_matching_participant() {
        // テスト項目: 接続 ID に一致する参加者がすべて削除され、他は残る
        // given (前提条件):
        let mut room = create_test_room(RoomLimits::unbounded());
        let shared_connection = ConnectionId::generate();
        room.add_participant(participant("u1", "Alice", shared_connection))
            .unwrap();
        room.add_participant(participant("u2", "Bob", ConnectionId::generate()))
            .unwrap();
        room.add_participant(participant("u3", "Carol", shared_connection))
            .unwrap();

        // when (操作):
        let evicted = room.remove_connection(&shared_connection);

        // then (期待する結果):
        assert_eq!(evicted.len(), 2);
        assert_eq!(room.participants.len(), 1);
        assert_eq!(room.participants[0].user_id, user("u2"));
    }

    #[test]
    fn test_play_without_position_restarts_from_zero() {
        // テスト項目: 位置指定なしの play は位置を 0 に戻し、トラック指定なしなら現在のトラックを維持する
        // given (前提条件):
        let mut room = create_test_room(RoomLimits::unbounded());
        let track = MediaItem::new(json!({"id": "t1"}));
        room.play(
            Some(track.clone()),
            Some(PlaybackPosition::new(5000.0).unwrap()),
        );

        // when (操作):
        room.play(None, None);

        // then (期待する結果):
        assert!(room.is_playing);
        assert_eq!(room.current_track, Some(track));
        assert_eq!(room.current_time, PlaybackPosition::ZERO);
    }

    #[test]
    fn test_pause_without_position_keeps_current_time() {
        // テスト項目: 位置指定なしの pause は現在の位置を維持する
        // given (前提条件):
        let mut room = create_test_room(RoomLimits::unbounded());
        room.play(None, Some(PlaybackPosition::new(4200.0).unwrap()));

        // when (操作):
        room.pause(None);

        // then (期待する結果):
        assert!(!room.is_playing);
        assert_eq!(room.current_time.millis(), 4200.0);
    }

    #[test]
    fn test_add_track_appends_duplicates_until_capacity() {
        // テスト項目: 同一トラックも重複除去せずに追加され、上限を超えると拒否される
        // given (前提条件):
        let mut room = create_test_room(RoomLimits {
            max_participants: None,
            max_queue_length: Some(2),
        });
        let track = MediaItem::new(json!({"id": "t1"}));

        // when (操作):
        room.add_track(track.clone()).unwrap();
        room.add_track(track.clone()).unwrap();
        let overflow = room.add_track(track.clone());

        // then (期待する結果):
        assert_eq!(room.queue, vec![track.clone(), track]);
        assert_eq!(overflow, Err(DomainError::QueueCapacityExceeded(2)));
    }
}
