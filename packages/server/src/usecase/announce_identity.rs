//! UseCase: アイデンティティ申告処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AnnounceIdentityUseCase::execute() メソッド
//! - アイデンティティの検証と接続レジストリへの登録
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：非空の userId / username だけが登録される
//! - 再 announce が重複エントリを作らず上書きになることを保証
//! - 確認イベントが本人にだけ送られることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続のアイデンティティ申告
//! - 異常系：空の userId / username での申告
//! - エッジケース：同一接続からの再 announce（上書き）

use std::sync::Arc;

use tokio::sync::Mutex;

use hiroma_shared::time::{get_utc_timestamp, timestamp_to_rfc3339};

use crate::domain::{ConnectionId, Identity, Lobby, MessagePusher, Timestamp};
use crate::infrastructure::dto::websocket::{ConnectionConfirmedPayload, ServerEvent};

use super::error::EventError;

/// アイデンティティ申告のユースケース
pub struct AnnounceIdentityUseCase {
    /// コーディネータの状態テーブル
    lobby: Arc<Mutex<Lobby>>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl AnnounceIdentityUseCase {
    /// 新しい AnnounceIdentityUseCase を作成
    pub fn new(lobby: Arc<Mutex<Lobby>>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            lobby,
            message_pusher,
        }
    }

    /// アイデンティティ申告を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 申告元の接続 ID
    /// * `user_id` - クライアントが名乗った userId（ワイヤフォーマットのまま）
    /// * `username` - クライアントが名乗った username
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 登録成功（本人に connection_confirmed を unicast 済み）
    /// * `Err(EventError::IdentityInvalid)` - userId / username が空
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        user_id: String,
        username: String,
    ) -> Result<(), EventError> {
        // 1. アイデンティティの検証（非空チェックは値オブジェクトが行う）
        let identity = Identity::new(user_id, username)
            .map_err(|e| EventError::IdentityInvalid(e.to_string()))?;

        let now = Timestamp::new(get_utc_timestamp());

        // 2. レジストリに登録（再 announce は上書き）し、ロックを保持したまま確認を送る
        let mut lobby = self.lobby.lock().await;
        lobby
            .registry
            .announce(connection_id.clone(), identity.clone(), now);

        let confirmed = ServerEvent::ConnectionConfirmed(ConnectionConfirmedPayload {
            message: "Connected to chat server".to_string(),
            timestamp: timestamp_to_rfc3339(now.value()),
        });
        self.message_pusher
            .unicast(connection_id, &confirmed.to_json())
            .await;

        tracing::info!(
            "Connection '{}' announced as '{}'",
            connection_id,
            identity.username()
        );

        Ok(())
    }
}
