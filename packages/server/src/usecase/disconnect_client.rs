//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - レジストリ・メンバーシップ・タイピングの3テーブルからの除去と退室通知
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：切断したユーザーの痕跡がどのテーブルにも残らない
//! - 入力中のまま切断したユーザーの「入力中…」表示が残らないことを保証
//!   （ghost typing の防止）
//! - 2重切断（明示的な退室とトランスポートのクローズの両方から呼ばれる場合）が
//!   2重通知にならないことを確認（冪等性）
//!
//! ### どのような状況を想定しているか
//! - 正常系：在室中の接続の切断と残メンバーへの通知
//! - エッジケース：announce 前の切断、2重切断、入力中のままの切断

use std::sync::Arc;

use tokio::sync::Mutex;

use hiroma_shared::time::{get_utc_timestamp, timestamp_to_rfc3339};

use crate::domain::{ConnectionId, Lobby, MessagePusher, Timestamp};
use crate::infrastructure::dto::conversion::room_users;
use crate::infrastructure::dto::websocket::{ServerEvent, UserLeftPayload, UserTypingPayload};

/// 切断処理のユースケース
pub struct DisconnectClientUseCase {
    /// コーディネータの状態テーブル
    lobby: Arc<Mutex<Lobby>>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(lobby: Arc<Mutex<Lobby>>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            lobby,
            message_pusher,
        }
    }

    /// 切断処理を実行
    ///
    /// 切断はこのコーディネータにおける唯一のキャンセルシグナルであり、冪等です。
    /// 同じ接続に対して2回呼ばれても（明示的な退室とその後のトランスポート
    /// クローズなど）、2回目は何も起こしません。エラーは返しません。
    ///
    /// レジスタからの除去 → 退室 → 退室通知 → タイピング解除までを同一ロックの
    /// 中で行うため、観測者から見て原子的です。
    pub async fn execute(&self, connection_id: &ConnectionId) {
        let now = Timestamp::new(get_utc_timestamp());

        let mut lobby = self.lobby.lock().await;

        // announce 前の切断、または2重切断。状態はどこにもないので何もしない
        let Some(client) = lobby.registry.forget(connection_id) else {
            tracing::debug!("Disconnect for unknown connection '{}', ignoring", connection_id);
            return;
        };
        let username = client.identity.username().to_string();

        if let Some(room_id) = lobby.membership.leave(connection_id) {
            let members = lobby.membership.members_of(&room_id);
            let targets: Vec<ConnectionId> =
                members.iter().map(|m| m.connection_id.clone()).collect();

            let left_event = ServerEvent::UserLeft(UserLeftPayload {
                username: username.clone(),
                message: format!("{} left the room", username),
                timestamp: timestamp_to_rfc3339(now.value()),
                room_users: room_users(members),
            });
            self.message_pusher
                .broadcast(targets.clone(), &left_event.to_json())
                .await;

            // 切断したユーザーの「入力中」を残さない
            if lobby.typing.stop(&room_id, &username) {
                let typing_event = ServerEvent::UserTyping(UserTypingPayload {
                    username: username.clone(),
                    is_typing: false,
                    typing_snapshot: lobby.typing.snapshot(&room_id),
                });
                self.message_pusher
                    .broadcast(targets, &typing_event.to_json())
                    .await;
            }
        }

        tracing::info!("'{}' disconnected (connection '{}')", username, connection_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MockMessagePusher, RoomId};
    use crate::usecase::test_support::RecordingPusher;
    use crate::usecase::{AnnounceIdentityUseCase, JoinRoomUseCase, UpdateTypingUseCase};

    fn create_test_lobby() -> Arc<Mutex<Lobby>> {
        Arc::new(Mutex::new(Lobby::new()))
    }

    async fn announce_and_join(
        lobby: &Arc<Mutex<Lobby>>,
        connection_id: &ConnectionId,
        user_id: &str,
        username: &str,
        room: &str,
    ) {
        let mut mock = MockMessagePusher::new();
        mock.expect_unicast().return_const(());
        mock.expect_broadcast().return_const(());
        let mock = Arc::new(mock);
        AnnounceIdentityUseCase::new(lobby.clone(), mock.clone())
            .execute(connection_id, user_id.to_string(), username.to_string())
            .await
            .unwrap();
        JoinRoomUseCase::new(lobby.clone(), mock)
            .execute(connection_id, RoomId::new(room))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_disconnect_removes_all_state_and_notifies_room() {
        // テスト項目: 切断で3テーブル全てから除去され、残メンバーに user_left が届く
        // given (前提条件):
        let lobby = create_test_lobby();
        let ann = ConnectionId::new("c1");
        let bob = ConnectionId::new("c2");
        announce_and_join(&lobby, &ann, "1", "ann", "r1").await;
        announce_and_join(&lobby, &bob, "2", "bob", "r1").await;
        let pusher = Arc::new(RecordingPusher::new());
        let usecase = DisconnectClientUseCase::new(lobby.clone(), pusher.clone());

        // when (操作):
        usecase.execute(&ann).await;

        // then (期待する結果):
        {
            let lobby = lobby.lock().await;
            assert!(lobby.registry.lookup(&ann).is_none());
            assert_eq!(lobby.membership.current_room_of(&ann), None);
            let members = lobby.membership.members_of(&RoomId::new("r1"));
            assert_eq!(members.len(), 1);
            assert_eq!(members[0].identity.username(), "bob");
        }
        let to_bob = pusher.sent_to(&bob).await;
        let ServerEvent::UserLeft(left) = to_bob.last().unwrap() else {
            panic!("expected user_left, got {:?}", to_bob.last());
        };
        assert_eq!(left.username, "ann");
        assert_eq!(left.room_users.len(), 1);
        assert_eq!(left.room_users[0].username, "bob");
    }

    #[tokio::test]
    async fn test_disconnect_while_typing_clears_ghost_typing() {
        // テスト項目: 入力中のまま切断すると、残メンバーに user_left と空の typing 更新の両方が届く
        // given (前提条件): ann が入力中であることを bob が観測している
        let lobby = create_test_lobby();
        let ann = ConnectionId::new("c1");
        let bob = ConnectionId::new("c2");
        announce_and_join(&lobby, &ann, "1", "ann", "r1").await;
        announce_and_join(&lobby, &bob, "2", "bob", "r1").await;
        let pusher = Arc::new(RecordingPusher::new());
        UpdateTypingUseCase::new(lobby.clone(), pusher.clone())
            .execute(&ann, true)
            .await
            .unwrap();
        let usecase = DisconnectClientUseCase::new(lobby.clone(), pusher.clone());

        // when (操作): stop_typing を送らずに切断する
        usecase.execute(&ann).await;

        // then (期待する結果): user_left の後に typingSnapshot が空の更新が届く
        let to_bob = pusher.sent_to(&bob).await;
        let left_pos = to_bob
            .iter()
            .position(|e| matches!(e, ServerEvent::UserLeft(_)))
            .expect("expected user_left");
        let typing_pos = to_bob
            .iter()
            .rposition(|e| matches!(e, ServerEvent::UserTyping(p) if !p.is_typing))
            .expect("expected typing update after disconnect");
        assert!(left_pos < typing_pos);
        let ServerEvent::UserTyping(typing) = &to_bob[typing_pos] else {
            unreachable!();
        };
        assert!(typing.typing_snapshot.is_empty());
        assert_eq!(lobby.lock().await.typing.room_count(), 0);
    }

    #[tokio::test]
    async fn test_double_disconnect_does_not_notify_twice() {
        // テスト項目: 2重切断は2重通知にならない（冪等性）
        // given (前提条件):
        let lobby = create_test_lobby();
        let ann = ConnectionId::new("c1");
        let bob = ConnectionId::new("c2");
        announce_and_join(&lobby, &ann, "1", "ann", "r1").await;
        announce_and_join(&lobby, &bob, "2", "bob", "r1").await;
        let pusher = Arc::new(RecordingPusher::new());
        let usecase = DisconnectClientUseCase::new(lobby.clone(), pusher.clone());
        usecase.execute(&ann).await;
        let sent_after_first = pusher.sent().await.len();

        // when (操作):
        usecase.execute(&ann).await;

        // then (期待する結果): 2回目は何も送信されない
        assert_eq!(pusher.sent().await.len(), sent_after_first);
    }

    #[tokio::test]
    async fn test_disconnect_before_announce_is_noop() {
        // テスト項目: announce 前の切断は状態も通知も発生しない
        // given (前提条件):
        let lobby = create_test_lobby();
        let pusher = Arc::new(RecordingPusher::new());
        let usecase = DisconnectClientUseCase::new(lobby.clone(), pusher.clone());

        // when (操作):
        usecase.execute(&ConnectionId::new("ghost")).await;

        // then (期待する結果):
        assert!(pusher.sent().await.is_empty());
        assert_eq!(lobby.lock().await.connected_clients(), 0);
    }

    #[tokio::test]
    async fn test_last_member_disconnect_prunes_room() {
        // テスト項目: 最後のメンバーの切断でルームのエントリが刈り取られる
        // given (前提条件):
        let lobby = create_test_lobby();
        let ann = ConnectionId::new("c1");
        announce_and_join(&lobby, &ann, "1", "ann", "r1").await;
        let pusher = Arc::new(RecordingPusher::new());
        let usecase = DisconnectClientUseCase::new(lobby.clone(), pusher.clone());

        // when (操作):
        usecase.execute(&ann).await;

        // then (期待する結果):
        assert_eq!(lobby.lock().await.active_rooms(), 0);
    }
}
