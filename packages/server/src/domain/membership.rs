//! ルームメンバーシップテーブル
//!
//! ルームごとの在室メンバー集合と、接続ごとの「現在ルーム」ポインタ
//! （ConnectionId → RoomId）を保持します。接続は同時に高々1つのルームにしか
//! 属せず、別ルームへの join は古いルームからの leave を暗黙に伴います。
//! ルーム切り替えは leave → join を1操作として扱うため、観測者が
//! 「2ルームに同時在室」や「どのルームにもいない中間状態」を見ることは
//! ありません。空になったルームのエントリは即座に刈り取られます。

use std::collections::HashMap;

use super::entity::RoomMember;
use super::value_object::{ConnectionId, Identity, RoomId, Timestamp};

/// join の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// すでに同じルームに在室していた（状態変化なし、通知義務なし）
    AlreadyInRoom,
    /// 入室した。別ルームに在室していた場合はそのルーム ID を持つ
    Joined { previous_room: Option<RoomId> },
}

/// ルームメンバーシップテーブル
///
/// メンバー集合は userId をキーに持つ集合セマンティクス（同一アイデンティティの
/// 重複入室はエントリを増やさない）。
#[derive(Debug, Default)]
pub struct RoomMembership {
    /// RoomId → (userId → RoomMember)
    rooms: HashMap<RoomId, HashMap<String, RoomMember>>,
    /// 接続ごとの現在ルームポインタ
    current: HashMap<ConnectionId, RoomId>,
}

impl RoomMembership {
    /// 新しい RoomMembership を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 接続をルームに入室させる
    ///
    /// 別ルームに在室中の場合は先にそのルームから退室させ、退室したルーム ID を
    /// `JoinOutcome::Joined` で返します。同一ルームへの再入室は状態を変えずに
    /// `JoinOutcome::AlreadyInRoom` を返します。
    pub fn join(
        &mut self,
        connection_id: ConnectionId,
        identity: Identity,
        room_id: RoomId,
        joined_at: Timestamp,
    ) -> JoinOutcome {
        if self.current.get(&connection_id) == Some(&room_id) {
            return JoinOutcome::AlreadyInRoom;
        }

        let previous_room = self.leave(&connection_id);

        let member = RoomMember::new(connection_id.clone(), identity.clone(), joined_at);
        self.rooms
            .entry(room_id.clone())
            .or_default()
            .insert(identity.user_id().to_string(), member);
        self.current.insert(connection_id, room_id);

        JoinOutcome::Joined { previous_room }
    }

    /// 接続を現在のルームから退室させる
    ///
    /// どのルームにも在室していない場合は何もせず None を返します。
    /// 空になったルームのエントリは刈り取られます。
    pub fn leave(&mut self, connection_id: &ConnectionId) -> Option<RoomId> {
        let room_id = self.current.remove(connection_id)?;
        if let Some(members) = self.rooms.get_mut(&room_id) {
            members.retain(|_, member| member.connection_id != *connection_id);
            if members.is_empty() {
                self.rooms.remove(&room_id);
            }
        }
        Some(room_id)
    }

    /// ルームの在室メンバーのスナップショットを取得
    ///
    /// ある時点のコピーであり、以降の変更には追随しません。username 順に
    /// ソートされた安定した並びを返します（表示用の並べ替えは UI の責務）。
    pub fn members_of(&self, room_id: &RoomId) -> Vec<RoomMember> {
        let mut members: Vec<RoomMember> = self
            .rooms
            .get(room_id)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default();
        members.sort_by(|a, b| a.identity.username().cmp(b.identity.username()));
        members
    }

    /// 接続の現在ルームを取得
    pub fn current_room_of(&self, connection_id: &ConnectionId) -> Option<&RoomId> {
        self.current.get(connection_id)
    }

    /// 在室メンバーが1人以上いるルームの数
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(user_id: &str, username: &str) -> Identity {
        Identity::new(user_id, username).unwrap()
    }

    #[test]
    fn test_join_new_room() {
        // テスト項目: 未入室の接続が join するとメンバーに追加される
        // given (前提条件):
        let mut membership = RoomMembership::new();
        let connection_id = ConnectionId::new("c1");

        // when (操作):
        let outcome = membership.join(
            connection_id.clone(),
            identity("1", "ann"),
            RoomId::new("r1"),
            Timestamp::new(1000),
        );

        // then (期待する結果):
        assert_eq!(outcome, JoinOutcome::Joined { previous_room: None });
        assert_eq!(membership.current_room_of(&connection_id), Some(&RoomId::new("r1")));
        let members = membership.members_of(&RoomId::new("r1"));
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].identity.username(), "ann");
    }

    #[test]
    fn test_join_switches_room_and_prunes_old_one() {
        // テスト項目: 別ルームへの join は旧ルームからの退室を伴い、空ルームは刈り取られる
        // given (前提条件):
        let mut membership = RoomMembership::new();
        let connection_id = ConnectionId::new("c1");
        membership.join(
            connection_id.clone(),
            identity("1", "ann"),
            RoomId::new("r1"),
            Timestamp::new(1000),
        );

        // when (操作):
        let outcome = membership.join(
            connection_id.clone(),
            identity("1", "ann"),
            RoomId::new("r2"),
            Timestamp::new(2000),
        );

        // then (期待する結果): r1 は空になり刈り取られ、r2 のみに在室
        assert_eq!(
            outcome,
            JoinOutcome::Joined {
                previous_room: Some(RoomId::new("r1"))
            }
        );
        assert!(membership.members_of(&RoomId::new("r1")).is_empty());
        assert_eq!(membership.members_of(&RoomId::new("r2")).len(), 1);
        assert_eq!(membership.room_count(), 1);
        assert_eq!(membership.current_room_of(&connection_id), Some(&RoomId::new("r2")));
    }

    #[test]
    fn test_rejoin_same_room_is_noop() {
        // テスト項目: 同一ルームへの再 join は状態を変えず AlreadyInRoom を返す
        // given (前提条件):
        let mut membership = RoomMembership::new();
        let connection_id = ConnectionId::new("c1");
        membership.join(
            connection_id.clone(),
            identity("1", "ann"),
            RoomId::new("r1"),
            Timestamp::new(1000),
        );

        // when (操作):
        let outcome = membership.join(
            connection_id.clone(),
            identity("1", "ann"),
            RoomId::new("r1"),
            Timestamp::new(2000),
        );

        // then (期待する結果): joined_at も変化しない
        assert_eq!(outcome, JoinOutcome::AlreadyInRoom);
        let members = membership.members_of(&RoomId::new("r1"));
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].joined_at, Timestamp::new(1000));
    }

    #[test]
    fn test_leave_without_room_is_noop() {
        // テスト項目: 未入室の接続の leave は何もしない
        // given (前提条件):
        let mut membership = RoomMembership::new();

        // when (操作):
        let result = membership.leave(&ConnectionId::new("c1"));

        // then (期待する結果):
        assert!(result.is_none());
        assert_eq!(membership.room_count(), 0);
    }

    #[test]
    fn test_leave_keeps_other_members() {
        // テスト項目: 退室しても他のメンバーはルームに残る
        // given (前提条件):
        let mut membership = RoomMembership::new();
        let ann_conn = ConnectionId::new("c1");
        let bob_conn = ConnectionId::new("c2");
        membership.join(ann_conn.clone(), identity("1", "ann"), RoomId::new("r1"), Timestamp::new(1000));
        membership.join(bob_conn.clone(), identity("2", "bob"), RoomId::new("r1"), Timestamp::new(2000));

        // when (操作):
        let left = membership.leave(&ann_conn);

        // then (期待する結果):
        assert_eq!(left, Some(RoomId::new("r1")));
        let members = membership.members_of(&RoomId::new("r1"));
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].identity.username(), "bob");
        assert_eq!(membership.room_count(), 1);
    }

    #[test]
    fn test_members_of_is_sorted_snapshot() {
        // テスト項目: members_of は username 順のスナップショット（コピー）を返す
        // given (前提条件):
        let mut membership = RoomMembership::new();
        membership.join(ConnectionId::new("c1"), identity("3", "charlie"), RoomId::new("r1"), Timestamp::new(1000));
        membership.join(ConnectionId::new("c2"), identity("1", "ann"), RoomId::new("r1"), Timestamp::new(2000));
        membership.join(ConnectionId::new("c3"), identity("2", "bob"), RoomId::new("r1"), Timestamp::new(3000));

        // when (操作):
        let snapshot = membership.members_of(&RoomId::new("r1"));
        membership.leave(&ConnectionId::new("c2"));

        // then (期待する結果): ソート済み、かつ以降の変更に影響されない
        let usernames: Vec<&str> = snapshot.iter().map(|m| m.identity.username()).collect();
        assert_eq!(usernames, vec!["ann", "bob", "charlie"]);
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn test_same_identity_joins_are_set_semantics() {
        // テスト項目: 同一アイデンティティの入室はメンバー集合を増やさない
        // given (前提条件):
        let mut membership = RoomMembership::new();
        membership.join(ConnectionId::new("c1"), identity("1", "ann"), RoomId::new("r1"), Timestamp::new(1000));

        // when (操作): 別接続だが同じ userId で入室
        membership.join(ConnectionId::new("c2"), identity("1", "ann"), RoomId::new("r1"), Timestamp::new(2000));

        // then (期待する結果):
        assert_eq!(membership.members_of(&RoomId::new("r1")).len(), 1);
    }
}
