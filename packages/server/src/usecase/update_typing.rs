//! UseCase: 入力中シグナル処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdateTypingUseCase::execute() メソッド
//! - 入力中状態の記録・解除と、本人を除くルームメンバーへの通知
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：通知は本人以外にのみ届き、最新のスナップショットを含む
//! - stop の冪等性（2回目の stop も同じ空集合を報告する）を保証
//! - 未入室の入力中シグナルが黙って捨てられることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：在室中の接続からの start / stop
//! - 異常系：announce 前のシグナル
//! - エッジケース：未入室のシグナル（no-op）、stop の重複呼び出し

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, Lobby, MessagePusher};
use crate::infrastructure::dto::websocket::{ServerEvent, UserTypingPayload};

use super::error::EventError;

/// 入力中シグナルのユースケース
pub struct UpdateTypingUseCase {
    /// コーディネータの状態テーブル
    lobby: Arc<Mutex<Lobby>>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl UpdateTypingUseCase {
    /// 新しい UpdateTypingUseCase を作成
    pub fn new(lobby: Arc<Mutex<Lobby>>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            lobby,
            message_pusher,
        }
    }

    /// 入力中シグナルを処理
    ///
    /// 未入室の接続からのシグナルはエラーにせず黙って捨てます（入力中表示は
    /// あくまで補助的なシグナルであり、拒否して接続を煩わせる価値がない）。
    /// stop は冪等で、状態が変わらなくても最新のスナップショットを通知します。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - シグナル元の接続 ID
    /// * `is_typing` - `true` なら start_typing、`false` なら stop_typing
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 処理完了（未入室の no-op を含む）
    /// * `Err(EventError::NotAuthenticated)` - announce 前の接続
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        is_typing: bool,
    ) -> Result<(), EventError> {
        let mut lobby = self.lobby.lock().await;

        // 1. 前提条件: announce 済みであること
        let identity = lobby
            .registry
            .lookup(connection_id)
            .map(|client| client.identity.clone())
            .ok_or(EventError::NotAuthenticated(
                "announce an identity before typing signals",
            ))?;
        let username = identity.username().to_string();

        // 2. 未入室のシグナルは no-op
        let Some(room_id) = lobby.membership.current_room_of(connection_id).cloned() else {
            tracing::debug!("Typing signal from '{}' outside any room, ignoring", username);
            return Ok(());
        };

        // 3. 入力中集合の更新
        if is_typing {
            lobby.typing.start(room_id.clone(), &username);
        } else {
            lobby.typing.stop(&room_id, &username);
        }

        // 4. 本人を除くルームメンバーへ最新スナップショットを通知
        let others: Vec<ConnectionId> = lobby
            .membership
            .members_of(&room_id)
            .iter()
            .map(|m| m.connection_id.clone())
            .filter(|c| c != connection_id)
            .collect();
        let event = ServerEvent::UserTyping(UserTypingPayload {
            username,
            is_typing,
            typing_snapshot: lobby.typing.snapshot(&room_id),
        });
        self.message_pusher
            .broadcast(others, &event.to_json())
            .await;

        Ok(())
    }
}
