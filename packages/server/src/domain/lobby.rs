//! Lobby 集約
//!
//! コーディネータが所有する状態テーブルを1つの集約にまとめたもの。
//! プロセスワイドなグローバル変数ではなく、この集約のインスタンスを
//! トランスポート層に注入する構成にすることで、テストごとに独立した
//! コーディネータを複数作れます。
//!
//! 排他制御は集約の外側（UseCase 層の `Mutex<Lobby>`）で行います。
//! 1イベントが複数テーブルにまたがる操作（ルーム切り替えの leave → join、
//! 切断時の leave + タイピング解除 + forget）は同じロックの中で完結するため、
//! 観測者から見て原子的です。

use super::membership::RoomMembership;
use super::registry::ConnectionRegistry;
use super::typing::TypingTracker;

/// コーディネータの状態テーブルを所有する集約
#[derive(Debug, Default)]
pub struct Lobby {
    /// 接続レジストリ（ConnectionId → ConnectedClient）
    pub registry: ConnectionRegistry,
    /// ルームメンバーシップ（RoomId → メンバー集合、ConnectionId → 現在ルーム）
    pub membership: RoomMembership,
    /// タイピングトラッカー（RoomId → 入力中ユーザー名）
    pub typing: TypingTracker,
}

impl Lobby {
    /// 新しい Lobby を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// announce 済みの接続数（ヘルスチェック用）
    pub fn connected_clients(&self) -> usize {
        self.registry.len()
    }

    /// 在室メンバーが1人以上いるルームの数（ヘルスチェック用）
    pub fn active_rooms(&self) -> usize {
        self.membership.room_count()
    }
}
