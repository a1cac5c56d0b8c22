//! 接続レジストリ
//!
//! 生きているトランスポート接続と、その接続が announce したアイデンティティの
//! 対応表。announce 前の接続はこのテーブルに存在せず、あらゆるイベントが
//! 未認証として拒否される根拠になります。

use std::collections::HashMap;

use super::entity::ConnectedClient;
use super::value_object::{ConnectionId, Identity, Timestamp};

/// 接続レジストリ（ConnectionId → ConnectedClient）
///
/// アイデンティティの検証（非空チェック）は `Identity` のコンストラクタで
/// 済んでいるため、ここでの登録は常に成功します。
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    clients: HashMap<ConnectionId, ConnectedClient>,
}

impl ConnectionRegistry {
    /// 新しい ConnectionRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 接続のアイデンティティを登録（既存エントリは上書き）
    ///
    /// 同一接続からの再 announce は重複エントリを作らず、アイデンティティを
    /// 上書きするだけの冪等な操作です。
    pub fn announce(&mut self, connection_id: ConnectionId, identity: Identity, joined_at: Timestamp) {
        let client = ConnectedClient::new(connection_id.clone(), identity, joined_at);
        self.clients.insert(connection_id, client);
    }

    /// 接続のアイデンティティを取得
    pub fn lookup(&self, connection_id: &ConnectionId) -> Option<&ConnectedClient> {
        self.clients.get(connection_id)
    }

    /// 接続のエントリを削除（存在しなくてもエラーにしない）
    pub fn forget(&mut self, connection_id: &ConnectionId) -> Option<ConnectedClient> {
        self.clients.remove(connection_id)
    }

    /// announce 済みの接続数
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
