//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 本文の検証（トリミング・空チェック）とルーム全員へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：メッセージは送信者を含むルーム全員に届く
//!   （送信者はこの echo で配送と順序を確認するため、別 unicast にはしない）
//! - 空白のみの本文が拒否され、状態もブロードキャストも発生しないことを保証
//! - メッセージ送信が送信者の入力中状態を解除することを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：在室中の接続からの送信
//! - 異常系：announce 前・未入室・空本文
//! - エッジケース：入力中のまま送信した場合の typing 解除通知

use std::sync::Arc;

use tokio::sync::Mutex;

use hiroma_shared::time::{get_utc_timestamp, timestamp_to_rfc3339};

use crate::domain::{
    ConnectionId, Lobby, MessageBody, MessageIdFactory, MessagePusher, Timestamp,
};
use crate::infrastructure::dto::websocket::{NewMessagePayload, ServerEvent, UserTypingPayload};

use super::error::EventError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// コーディネータの状態テーブル
    lobby: Arc<Mutex<Lobby>>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(lobby: Arc<Mutex<Lobby>>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            lobby,
            message_pusher,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 送信元の接続 ID
    /// * `raw_text` - クライアントから受信したままの本文（ここでトリミングされる）
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 送信成功（送信者を含むルーム全員にブロードキャスト済み）
    /// * `Err(EventError::NotAuthenticated)` - announce 前、または未入室
    /// * `Err(EventError::EmptyMessage)` - トリミング後に空
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        raw_text: String,
    ) -> Result<(), EventError> {
        let now = Timestamp::new(get_utc_timestamp());

        let mut lobby = self.lobby.lock().await;

        // 1. 前提条件: announce 済みで、どこかのルームに在室していること
        let identity = lobby
            .registry
            .lookup(connection_id)
            .map(|client| client.identity.clone())
            .ok_or(EventError::NotAuthenticated(
                "announce an identity before sending messages",
            ))?;
        let room_id = lobby
            .membership
            .current_room_of(connection_id)
            .cloned()
            .ok_or(EventError::NotAuthenticated(
                "join a room before sending messages",
            ))?;
        let username = identity.username().to_string();

        // 2. 本文の検証（トリミング後に空なら拒否。ブロードキャストは発生しない）
        let body = MessageBody::new(raw_text).map_err(|_| EventError::EmptyMessage)?;

        // 3. 送信者を含むルーム全員へブロードキャスト
        let message_id = MessageIdFactory::generate(now);
        let members = lobby.membership.members_of(&room_id);
        let targets: Vec<ConnectionId> = members.iter().map(|m| m.connection_id.clone()).collect();

        let event = ServerEvent::NewMessage(NewMessagePayload {
            id: message_id.into_string(),
            username: username.clone(),
            text: body.into_string(),
            timestamp: timestamp_to_rfc3339(now.value()),
            room_id: room_id.as_str().to_string(),
        });
        self.message_pusher
            .broadcast(targets, &event.to_json())
            .await;

        // 4. メッセージ送信は入力中状態を解除する
        if lobby.typing.stop(&room_id, &username) {
            let others: Vec<ConnectionId> = members
                .iter()
                .map(|m| m.connection_id.clone())
                .filter(|c| c != connection_id)
                .collect();
            let typing_event = ServerEvent::UserTyping(UserTypingPayload {
                username: username.clone(),
                is_typing: false,
                typing_snapshot: lobby.typing.snapshot(&room_id),
            });
            self.message_pusher
                .broadcast(others, &typing_event.to_json())
                .await;
        }

        tracing::info!("Message from '{}' in room '{}'", username, room_id);

        Ok(())
    }
}
