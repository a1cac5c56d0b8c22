//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信チャンネル（有界キュー）の管理
//! - クライアントへのメッセージ送信（unicast, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された sender を受け取り、メッセージ送信に使用します。
//!
//! 配送は best-effort です。送信は `try_send` による enqueue でありブロック
//! しません。登録されていない接続・受信側が落ちている接続へはスキップ、
//! キューが満杯の接続へは当該イベントをドロップします（newest-dropped）。
//! いずれの場合も配送確認は返しません（fire-and-forget）。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
///
/// ## フィールド
///
/// - `clients`: 接続中のクライアントと対応する送信チャンネルのマップ
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信チャンネル
    ///
    /// Key: ConnectionId
    /// Value: PusherChannel
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// 1接続への enqueue（ブロックしない）
    fn enqueue(connection_id: &ConnectionId, sender: &PusherChannel, content: &str) {
        match sender.try_send(content.to_string()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                // 受信が追いつかない接続にはイベントをドロップする（保証配送ではない）
                tracing::warn!(
                    "Outbound queue full for connection '{}', dropping event",
                    connection_id
                );
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(
                    "Connection '{}' closed its receiver, dropping event",
                    connection_id
                );
            }
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id.clone(), sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
    }

    async fn unicast(&self, connection_id: &ConnectionId, content: &str) {
        let clients = self.clients.lock().await;

        if let Some(sender) = clients.get(connection_id) {
            Self::enqueue(connection_id, sender, content);
        } else {
            tracing::debug!("Connection '{}' not found, dropping unicast", connection_id);
        }
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str) {
        let clients = self.clients.lock().await;

        for target in targets {
            if let Some(sender) = clients.get(&target) {
                Self::enqueue(&target, sender, content);
            } else {
                tracing::debug!("Connection '{}' not found during broadcast, skipping", target);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - WebSocketMessagePusher の基本的なメッセージ送信機能
    // - unicast: 特定の接続への送信
    // - broadcast: 複数接続への送信
    // - 存在しない接続・キュー満杯の接続の扱い（黙ってスキップ／ドロップされること）
    //
    // 【なぜこのテストが必要か】
    // - MessagePusher は UseCase から呼ばれる通信層の中核
    // - 配送は best-effort であり、存在しない接続への送信がエラーにも
    //   パニックにもならないことを保証する必要がある
    // - 有界キューのドロップポリシー（満杯時は newest-dropped）を固定する
    //
    // 【どのようなシナリオをテストするか】
    // 1. unicast の成功ケース
    // 2. unicast の no-op ケース（接続が存在しない）
    // 3. broadcast の成功ケース（複数接続）
    // 4. broadcast の部分スキップケース（一部の接続が存在しない）
    // 5. キュー満杯時のドロップケース
    // ========================================

    #[tokio::test]
    async fn test_unicast_success() {
        // テスト項目: 登録済みの接続にメッセージを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::channel(8);
        let connection_id = ConnectionId::new("c1");
        pusher.register_client(connection_id.clone(), tx).await;

        // when (操作):
        pusher.unicast(&connection_id, "Hello").await;

        // then (期待する結果):
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_unicast_to_unknown_connection_is_noop() {
        // テスト項目: 存在しない接続への unicast は何も起きない（silent no-op）
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        pusher.unicast(&ConnectionId::new("ghost"), "Hello").await;

        // then (期待する結果): パニックもエラーも発生しない
    }

    #[tokio::test]
    async fn test_broadcast_success() {
        // テスト項目: 複数の接続にメッセージをブロードキャストできる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::channel(8);
        let (tx2, mut rx2) = mpsc::channel(8);
        let ann = ConnectionId::new("c1");
        let bob = ConnectionId::new("c2");
        pusher.register_client(ann.clone(), tx1).await;
        pusher.register_client(bob.clone(), tx2).await;

        // when (操作):
        pusher.broadcast(vec![ann, bob], "Broadcast message").await;

        // then (期待する結果):
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
        assert_eq!(rx2.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_skips_unknown_connections() {
        // テスト項目: ブロードキャスト時、存在しない接続はスキップされる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::channel(8);
        let ann = ConnectionId::new("c1");
        pusher.register_client(ann.clone(), tx1).await;

        // when (操作):
        pusher
            .broadcast(vec![ann, ConnectionId::new("ghost")], "Broadcast message")
            .await;

        // then (期待する結果): 登録済みの接続には届く
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_full_queue_drops_event_without_blocking() {
        // テスト項目: キューが満杯の接続へのイベントはブロックせずにドロップされる
        // given (前提条件): 容量1のキューを満杯にしておく
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::channel(1);
        let ann = ConnectionId::new("c1");
        pusher.register_client(ann.clone(), tx).await;
        pusher.unicast(&ann, "first").await;

        // when (操作): 満杯のキューにもう1件送る
        pusher.unicast(&ann, "second").await;

        // then (期待する結果): 最初のイベントだけが残る（newest-dropped）
        assert_eq!(rx.recv().await, Some("first".to_string()));
        assert_eq!(rx.try_recv().ok(), None);
    }

    #[tokio::test]
    async fn test_broadcast_empty_targets() {
        // テスト項目: 空のターゲットリストでも問題なく処理される
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        pusher.broadcast(vec![], "Message").await;

        // then (期待する結果): 何も起きない
    }

    #[tokio::test]
    async fn test_unregistered_connection_no_longer_receives() {
        // テスト項目: 登録解除した接続はブロードキャストの対象にならない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::channel(8);
        let ann = ConnectionId::new("c1");
        pusher.register_client(ann.clone(), tx).await;
        pusher.unregister_client(&ann).await;

        // when (操作):
        pusher.broadcast(vec![ann], "Message").await;

        // then (期待する結果): チャンネルには何も届かない（sender は drop 済み）
        assert_eq!(rx.try_recv().ok(), None);
    }
}
