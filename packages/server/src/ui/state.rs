//! Server state shared by every handler.

use std::sync::Arc;

use crate::{
    config::FrameLimits,
    usecase::{GetRoomDetailUseCase, GetRoomsUseCase, RoomCoordinator},
};

/// Shared application state
pub struct AppState {
    /// RoomCoordinator（WebSocket コマンドの振り分けと排他制御）
    pub coordinator: Arc<RoomCoordinator>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// 受信フレームの文字数上限
    pub frame_limits: FrameLimits,
}
