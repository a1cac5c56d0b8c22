//! WebSocket ワイヤフォーマット定義
//!
//! テキストフレーム1枚が JSON イベント1件。イベント種別は `"type"` フィールド
//! （snake_case）でタグ付けされ、ペイロードのキーは camelCase です。
//!
//! タイムスタンプは全てコーディネータがブロードキャスト時点で採番した
//! RFC 3339 文字列で、クライアントから送られた時刻は使いません。

use serde::{Deserialize, Deserializer, Serialize};

// ========================================
// Inbound: client → coordinator
// ========================================

/// クライアントから受信するイベント
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// アイデンティティの申告（接続直後に1回。再送は上書き）
    Announce(AnnouncePayload),
    /// ルームへの入室（在室中の別ルームからは暗黙に退室）
    JoinRoom(JoinRoomPayload),
    /// 現在のルームへのメッセージ送信
    SendMessage(SendMessagePayload),
    /// 入力中シグナルの開始
    StartTyping,
    /// 入力中シグナルの解除
    StopTyping,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncePayload {
    /// アカウントサービスが発行したユーザー ID
    ///
    /// 元のフロントエンドは数値の DB id をそのまま送ってくるため、
    /// 文字列と数値の両方を受け付けます。
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomPayload {
    pub room_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub text: String,
}

/// JSON の文字列・数値の両方を String として受け付けるデシリアライザ
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(i64),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(value) => value,
        StringOrNumber::Number(value) => value.to_string(),
    })
}

// ========================================
// Outbound: coordinator → client
// ========================================

/// クライアントへ送信するイベント
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// announce 成功の確認（本人のみ）
    ConnectionConfirmed(ConnectionConfirmedPayload),
    /// 入室成功の確認（本人のみ）
    RoomJoined(RoomJoinedPayload),
    /// 在室メンバー一覧の更新（本人のみ）
    RoomUsersUpdate(RoomUsersUpdatePayload),
    /// 他メンバーの入室通知（本人以外のルームメンバー）
    UserJoined(UserJoinedPayload),
    /// メンバーの退室通知（残ったルームメンバー）
    UserLeft(UserLeftPayload),
    /// チャットメッセージ（送信者を含むルームメンバー全員）
    NewMessage(NewMessagePayload),
    /// 入力中状態の更新（本人以外のルームメンバー）
    UserTyping(UserTypingPayload),
    /// イベント単位のエラー（本人のみ。接続は維持される）
    Error(ErrorPayload),
}

impl ServerEvent {
    /// ワイヤフォーマット（JSON 文字列）へ変換
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("ServerEvent should always serialize")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfirmedPayload {
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomJoinedPayload {
    pub room_id: String,
    pub message: String,
    pub timestamp: String,
}

/// 在室メンバー一覧の1エントリ
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomUserDto {
    pub username: String,
    pub user_id: String,
    pub joined_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomUsersUpdatePayload {
    pub room_users: Vec<RoomUserDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserJoinedPayload {
    pub username: String,
    pub message: String,
    pub timestamp: String,
    pub room_users: Vec<RoomUserDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserLeftPayload {
    pub username: String,
    pub message: String,
    pub timestamp: String,
    pub room_users: Vec<RoomUserDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewMessagePayload {
    pub id: String,
    pub username: String,
    pub text: String,
    pub timestamp: String,
    pub room_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserTypingPayload {
    pub username: String,
    pub is_typing: bool,
    pub typing_snapshot: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}
