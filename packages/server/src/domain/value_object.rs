//! 値オブジェクト定義
//!
//! コーディネータが扱う識別子・メッセージ本文・タイムスタンプの値オブジェクト。
//! 不変条件（非空チェック、トリミング）は全てコンストラクタで強制されるため、
//! 値オブジェクトを受け取る側は検証済みであることを前提にできます。

use thiserror::Error;
use uuid::Uuid;

/// Identity の検証エラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// userId が空
    #[error("userId must not be empty")]
    EmptyUserId,
    /// username が空
    #[error("username must not be empty")]
    EmptyUsername,
}

/// メッセージ本文の検証エラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageBodyError {
    /// トリミング後に空
    #[error("message cannot be empty")]
    Empty,
}

/// 接続 ID
///
/// トランスポート層が WebSocket アップグレード時に採番する不透明な識別子。
/// 接続のライフタイムの間だけ存在します。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// 既存の値から ConnectionId を作成（主にテスト用）
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 新しい ConnectionId を採番（UUID v4）
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ルーム ID
///
/// 外部のルームカタログが定義する不透明な文字列。コーディネータは存在チェックを
/// 行わず、グルーピングキーとしてのみ使用します（検証はカタログの責務）。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    /// RoomId を作成（額面どおりに受け入れる。検証なし）
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// クライアントが名乗るアイデンティティ
///
/// 接続直後に announce され, 以降は額面どおりに信頼されます（検証は接続前に
/// アカウントサービスが済ませている前提）。コーディネータの契約は
/// 「userId / username が非空であること」のみです。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: String,
    username: String,
}

impl Identity {
    /// 新しい Identity を作成
    ///
    /// # Returns
    ///
    /// * `Ok(Identity)` - userId / username がともに非空（トリミング後）
    /// * `Err(IdentityError)` - どちらかが空
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Result<Self, IdentityError> {
        let user_id = user_id.into();
        let username = username.into();
        if user_id.trim().is_empty() {
            return Err(IdentityError::EmptyUserId);
        }
        if username.trim().is_empty() {
            return Err(IdentityError::EmptyUsername);
        }
        Ok(Self { user_id, username })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// メッセージ本文
///
/// 構築時にトリミングされます。トリミング後に空となる本文は拒否されます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBody(String);

impl MessageBody {
    /// 新しい MessageBody を作成（トリミングして保持）
    pub fn new(raw: impl Into<String>) -> Result<Self, MessageBodyError> {
        let trimmed = raw.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(MessageBodyError::Empty);
        }
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unix タイムスタンプ（UTC、ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// メッセージ ID
///
/// タイムスタンプ（base36）をプレフィックスに持つため、自然順ソートがほぼ
/// 時系列順になります。グローバルなシーケンス番号は不要（ルーム内の順序は
/// ブロードキャストの直列化が保証する）。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// MessageId のファクトリ
pub struct MessageIdFactory;

impl MessageIdFactory {
    /// タイムスタンププレフィックス + ランダムサフィックスの MessageId を生成
    pub fn generate(timestamp: Timestamp) -> MessageId {
        let prefix = to_base36(timestamp.value().max(0) as u64);
        let suffix = Uuid::new_v4().simple().to_string();
        MessageId(format!("{}{}", prefix, &suffix[..8]))
    }
}

/// 非負整数を base36 文字列に変換
fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut reversed = Vec::new();
    while value > 0 {
        reversed.push(DIGITS[(value % 36) as usize] as char);
        value /= 36;
    }
    reversed.iter().rev().collect()
}
