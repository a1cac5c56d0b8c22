//! MessagePusher trait 定義
//!
//! ドメイン層が必要とするメッセージ送信のインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::value_object::ConnectionId;

/// 接続ごとのアウトバウンドキューの容量
///
/// キューが満杯の接続へのイベントはドロップされます（ドロップポリシーは
/// newest-dropped）。チャットイベントは保証配送ではないため、受信が追いつかない
/// 接続が送信側のイベント処理を止めるよりもドロップを選びます。
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// クライアントへの送信チャンネル
///
/// 接続ごとの有界アウトバウンドキュー。enqueue は `try_send` で行われ決して
/// ブロックしないため、遅い受信者や死んだ接続が送信側を止めることはありません。
pub type PusherChannel = mpsc::Sender<String>;

/// MessagePusher trait
///
/// 配送は best-effort（at-most-once）です。存在しない接続への unicast は
/// 黙って無視され、配送確認は返しません。UseCase 層はこの trait に依存し、
/// Infrastructure 層の具体的な実装には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定の接続にメッセージを送信（存在しない接続は無視）
    async fn unicast(&self, connection_id: &ConnectionId, content: &str);

    /// 指定した接続すべてにメッセージを送信（存在しない接続はスキップ）
    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str);
}
