//! Server state and connection management.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{Lobby, MessagePusher};
use crate::usecase::{
    AnnounceIdentityUseCase, DisconnectClientUseCase, JoinRoomUseCase, SendMessageUseCase,
    UpdateTypingUseCase,
};

/// Shared application state
pub struct AppState {
    /// AnnounceIdentityUseCase（アイデンティティ申告のユースケース）
    pub announce_identity_usecase: Arc<AnnounceIdentityUseCase>,
    /// JoinRoomUseCase（ルーム入室のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// UpdateTypingUseCase（入力中シグナルのユースケース）
    pub update_typing_usecase: Arc<UpdateTypingUseCase>,
    /// DisconnectClientUseCase（切断処理のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// MessagePusher（接続ごとの送信チャンネルの管理）
    pub message_pusher: Arc<dyn MessagePusher>,
    /// コーディネータの状態テーブル（ヘルスチェックが読み取りのみで参照する）
    pub lobby: Arc<Mutex<Lobby>>,
}
