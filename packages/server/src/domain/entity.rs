//! エンティティ定義

use super::value_object::{ConnectionId, Identity, Timestamp};

/// 接続済みクライアント
///
/// announce 済みの接続1本に対応します。接続 ID ごとに高々1つで、再 announce は
/// アイデンティティを上書きします（冪等）。切断時に破棄されます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedClient {
    /// トランスポートが採番した接続 ID
    pub connection_id: ConnectionId,
    /// クライアントが名乗ったアイデンティティ
    pub identity: Identity,
    /// announce された時刻
    pub joined_at: Timestamp,
}

impl ConnectedClient {
    /// 新しい ConnectedClient を作成
    pub fn new(connection_id: ConnectionId, identity: Identity, joined_at: Timestamp) -> Self {
        Self {
            connection_id,
            identity,
            joined_at,
        }
    }
}

/// ルームの在室メンバー
///
/// メンバーシップテーブルが保持する1エントリ。`members_of` のスナップショットは
/// このエンティティのコピーで構成されます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMember {
    /// メンバーの接続 ID
    pub connection_id: ConnectionId,
    /// メンバーのアイデンティティ
    pub identity: Identity,
    /// ルームに入室した時刻
    pub joined_at: Timestamp,
}

impl RoomMember {
    /// 新しい RoomMember を作成
    pub fn new(connection_id: ConnectionId, identity: Identity, joined_at: Timestamp) -> Self {
        Self {
            connection_id,
            identity,
            joined_at,
        }
    }
}
