//! タイピングトラッカー
//!
//! ルームごとの「入力中」ユーザー集合。エントリは誰かが入力中の間だけ存在し、
//! 空になった時点で刈り取られます。メンバーシップから外れる操作（退室・切断）は
//! 必ずここからも除去されます。明示的な stop_typing を送らずに切断したユーザーの
//! 「入力中…」表示が残り続けるバグ（ghost typing）を防ぐためです。

use std::collections::{HashMap, HashSet};

use super::value_object::RoomId;

/// タイピングトラッカー（RoomId → 入力中ユーザー名の集合）
#[derive(Debug, Default)]
pub struct TypingTracker {
    typing: HashMap<RoomId, HashSet<String>>,
}

impl TypingTracker {
    /// 新しい TypingTracker を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// ユーザーを入力中として記録（冪等）
    pub fn start(&mut self, room_id: RoomId, username: &str) {
        self.typing
            .entry(room_id)
            .or_default()
            .insert(username.to_string());
    }

    /// ユーザーの入力中状態を解除（冪等）
    ///
    /// # Returns
    ///
    /// 解除前に入力中だった場合 `true`。呼び出し側はこれを見て、タイピング更新の
    /// ブロードキャストが必要かどうかを判断できます。
    pub fn stop(&mut self, room_id: &RoomId, username: &str) -> bool {
        let Some(usernames) = self.typing.get_mut(room_id) else {
            return false;
        };
        let was_typing = usernames.remove(username);
        if usernames.is_empty() {
            self.typing.remove(room_id);
        }
        was_typing
    }

    /// ルームの入力中ユーザー名のスナップショットを取得（username 順）
    pub fn snapshot(&self, room_id: &RoomId) -> Vec<String> {
        let mut usernames: Vec<String> = self
            .typing
            .get(room_id)
            .map(|usernames| usernames.iter().cloned().collect())
            .unwrap_or_default();
        usernames.sort();
        usernames
    }

    /// 入力中ユーザーが1人以上いるルームの数
    pub fn room_count(&self) -> usize {
        self.typing.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_records_typing_user() {
        // テスト項目: start で入力中ユーザーが記録される
        // given (前提条件):
        let mut tracker = TypingTracker::new();

        // when (操作):
        tracker.start(RoomId::new("r1"), "ann");

        // then (期待する結果):
        assert_eq!(tracker.snapshot(&RoomId::new("r1")), vec!["ann".to_string()]);
    }

    #[test]
    fn test_start_is_idempotent() {
        // テスト項目: 同一ユーザーの start を繰り返しても集合は増えない（冪等性）
        // given (前提条件):
        let mut tracker = TypingTracker::new();
        tracker.start(RoomId::new("r1"), "ann");

        // when (操作):
        tracker.start(RoomId::new("r1"), "ann");

        // then (期待する結果):
        assert_eq!(tracker.snapshot(&RoomId::new("r1")).len(), 1);
    }

    #[test]
    fn test_stop_removes_and_prunes_empty_room() {
        // テスト項目: 最後の入力中ユーザーの stop でルームのエントリが刈り取られる
        // given (前提条件):
        let mut tracker = TypingTracker::new();
        tracker.start(RoomId::new("r1"), "ann");

        // when (操作):
        let was_typing = tracker.stop(&RoomId::new("r1"), "ann");

        // then (期待する結果):
        assert!(was_typing);
        assert!(tracker.snapshot(&RoomId::new("r1")).is_empty());
        assert_eq!(tracker.room_count(), 0);
    }

    #[test]
    fn test_stop_is_idempotent() {
        // テスト項目: stop を2回呼んでも観測可能な状態は同じ（冪等性）
        // given (前提条件):
        let mut tracker = TypingTracker::new();
        tracker.start(RoomId::new("r1"), "ann");
        tracker.stop(&RoomId::new("r1"), "ann");

        // when (操作):
        let was_typing = tracker.stop(&RoomId::new("r1"), "ann");

        // then (期待する結果): 2回目は「入力中ではなかった」と報告される
        assert!(!was_typing);
        assert!(tracker.snapshot(&RoomId::new("r1")).is_empty());
    }

    #[test]
    fn test_stop_keeps_other_typing_users() {
        // テスト項目: stop しても他の入力中ユーザーは残る
        // given (前提条件):
        let mut tracker = TypingTracker::new();
        tracker.start(RoomId::new("r1"), "ann");
        tracker.start(RoomId::new("r1"), "bob");

        // when (操作):
        tracker.stop(&RoomId::new("r1"), "ann");

        // then (期待する結果):
        assert_eq!(tracker.snapshot(&RoomId::new("r1")), vec!["bob".to_string()]);
        assert_eq!(tracker.room_count(), 1);
    }

    #[test]
    fn test_snapshot_is_sorted() {
        // テスト項目: スナップショットは username 順に並ぶ
        // given (前提条件):
        let mut tracker = TypingTracker::new();
        tracker.start(RoomId::new("r1"), "charlie");
        tracker.start(RoomId::new("r1"), "ann");
        tracker.start(RoomId::new("r1"), "bob");

        // when (操作):
        let snapshot = tracker.snapshot(&RoomId::new("r1"));

        // then (期待する結果):
        assert_eq!(
            snapshot,
            vec!["ann".to_string(), "bob".to_string(), "charlie".to_string()]
        );
    }

    #[test]
    fn test_rooms_are_independent() {
        // テスト項目: ルームごとの入力中集合は独立している
        // given (前提条件):
        let mut tracker = TypingTracker::new();
        tracker.start(RoomId::new("r1"), "ann");
        tracker.start(RoomId::new("r2"), "bob");

        // when (操作):
        tracker.stop(&RoomId::new("r1"), "ann");

        // then (期待する結果):
        assert!(tracker.snapshot(&RoomId::new("r1")).is_empty());
        assert_eq!(tracker.snapshot(&RoomId::new("r2")), vec!["bob".to_string()]);
    }
}
