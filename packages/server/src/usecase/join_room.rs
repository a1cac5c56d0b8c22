//! UseCase: ルーム入室処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 入室・ルーム切り替え・再入室それぞれの状態変化と通知
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：接続は同時に1ルームにしか在室できない
//! - ルーム切り替え時に user_left（旧ルーム）→ user_joined（新ルーム）の順で
//!   通知されることを保証
//! - 旧ルームでの入力中状態が退室とともに解除されることを確認（ghost typing 防止）
//!
//! ### どのような状況を想定しているか
//! - 正常系：初回入室、別ルームへの切り替え
//! - 異常系：announce 前の入室試行
//! - エッジケース：同一ルームへの再入室（通知なしの成功）

use std::sync::Arc;

use tokio::sync::Mutex;

use hiroma_shared::time::{get_utc_timestamp, timestamp_to_rfc3339};

use crate::domain::{ConnectionId, JoinOutcome, Lobby, MessagePusher, RoomId, Timestamp};
use crate::infrastructure::dto::conversion::room_users;
use crate::infrastructure::dto::websocket::{
    RoomJoinedPayload, RoomUsersUpdatePayload, ServerEvent, UserJoinedPayload, UserLeftPayload,
    UserTypingPayload,
};

use super::error::EventError;

/// ルーム入室のユースケース
pub struct JoinRoomUseCase {
    /// コーディネータの状態テーブル
    lobby: Arc<Mutex<Lobby>>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(lobby: Arc<Mutex<Lobby>>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            lobby,
            message_pusher,
        }
    }

    /// ルーム入室を実行
    ///
    /// 別ルームに在室中の場合は暗黙に退室し、旧ルームへ user_left を通知して
    /// から新ルームへの入室を通知します。退室と入室は同一ロックの中で行われる
    /// ため、観測者が2ルーム同時在室や無所属の中間状態を見ることはありません。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 入室する接続の ID
    /// * `room_id` - 入室先のルーム ID（存在チェックはしない。未知のルームは
    ///   入室者だけの空バケツとして扱われる）
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 入室成功（同一ルームへの再入室も成功。その場合は通知なし）
    /// * `Err(EventError::NotAuthenticated)` - announce 前の接続
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
    ) -> Result<(), EventError> {
        let now = Timestamp::new(get_utc_timestamp());
        let timestamp = timestamp_to_rfc3339(now.value());

        let mut lobby = self.lobby.lock().await;

        // 1. 前提条件: announce 済みであること
        let identity = lobby
            .registry
            .lookup(connection_id)
            .map(|client| client.identity.clone())
            .ok_or(EventError::NotAuthenticated(
                "announce an identity before joining a room",
            ))?;
        let username = identity.username().to_string();

        // 2. メンバーシップの更新（在室中の別ルームからは暗黙に退室）
        let outcome = lobby.membership.join(
            connection_id.clone(),
            identity.clone(),
            room_id.clone(),
            now,
        );

        let previous_room = match outcome {
            JoinOutcome::AlreadyInRoom => {
                // 同一ルームへの再入室は成功扱いで、通知義務は発生しない
                tracing::debug!("'{}' re-joined room '{}', skipping", username, room_id);
                return Ok(());
            }
            JoinOutcome::Joined { previous_room } => previous_room,
        };

        // 3. 旧ルームへの退室通知と入力中状態の解除
        if let Some(old_room) = previous_room {
            let members = lobby.membership.members_of(&old_room);
            let targets: Vec<ConnectionId> =
                members.iter().map(|m| m.connection_id.clone()).collect();

            let left_event = ServerEvent::UserLeft(UserLeftPayload {
                username: username.clone(),
                message: format!("{} left the room", username),
                timestamp: timestamp.clone(),
                room_users: room_users(members),
            });
            self.message_pusher
                .broadcast(targets.clone(), &left_event.to_json())
                .await;

            // 退室したユーザーの「入力中」を残さない
            if lobby.typing.stop(&old_room, &username) {
                let typing_event = ServerEvent::UserTyping(UserTypingPayload {
                    username: username.clone(),
                    is_typing: false,
                    typing_snapshot: lobby.typing.snapshot(&old_room),
                });
                self.message_pusher
                    .broadcast(targets, &typing_event.to_json())
                    .await;
            }
        }

        // 4. 本人への入室確認
        let joined_event = ServerEvent::RoomJoined(RoomJoinedPayload {
            room_id: room_id.as_str().to_string(),
            message: format!("Welcome to {}!", room_id),
            timestamp: timestamp.clone(),
        });
        self.message_pusher
            .unicast(connection_id, &joined_event.to_json())
            .await;

        // 5. 新ルームの他メンバーへの入室通知（最新のメンバー一覧つき）
        let members = lobby.membership.members_of(&room_id);
        let others: Vec<ConnectionId> = members
            .iter()
            .map(|m| m.connection_id.clone())
            .filter(|c| c != connection_id)
            .collect();
        let user_joined = ServerEvent::UserJoined(UserJoinedPayload {
            username: username.clone(),
            message: format!("{} joined the room", username),
            timestamp,
            room_users: room_users(members.clone()),
        });
        self.message_pusher
            .broadcast(others, &user_joined.to_json())
            .await;

        // 6. 本人へのメンバー一覧の送付
        let update = ServerEvent::RoomUsersUpdate(RoomUsersUpdatePayload {
            room_users: room_users(members),
        });
        self.message_pusher
            .unicast(connection_id, &update.to_json())
            .await;

        tracing::info!("'{}' joined room '{}'", username, room_id);

        Ok(())
    }
}
