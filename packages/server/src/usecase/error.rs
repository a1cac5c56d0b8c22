//! Event Router のエラー定義
//!
//! 全てイベント単位・非致命的なエラーです。違反したイベントは拒否され、エラー
//! ペイロードが当該接続にのみ unicast され、接続自体は開いたまま使い続けられます。
//! 状態は変更前に検証されるため、ロールバックは発生しません。

use thiserror::Error;

use crate::infrastructure::dto::websocket::ErrorPayload;

/// イベント処理のエラー種別
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    /// announce されたアイデンティティが不正（userId / username が空）
    #[error("invalid identity: {0}")]
    IdentityInvalid(String),

    /// announce 前の接続からのイベント、またはブロードキャスト先を持たない操作
    #[error("not authenticated: {0}")]
    NotAuthenticated(&'static str),

    /// トリミング後に空になるメッセージ本文
    #[error("message cannot be empty")]
    EmptyMessage,

    /// 未知または不正な形式のイベント
    #[error("unknown event: {0}")]
    UnknownEvent(String),
}

impl EventError {
    /// ワイヤフォーマットのエラーコード
    pub fn code(&self) -> &'static str {
        match self {
            EventError::IdentityInvalid(_) => "identity_invalid",
            EventError::NotAuthenticated(_) => "not_authenticated",
            EventError::EmptyMessage => "empty_message",
            EventError::UnknownEvent(_) => "unknown_event",
        }
    }

    /// 送信者に返すエラーペイロードへ変換
    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_payload_carries_code_and_message() {
        // テスト項目: エラーペイロードにコードとメッセージが入る
        // given (前提条件):
        let error = EventError::EmptyMessage;

        // when (操作):
        let payload = error.to_payload();

        // then (期待する結果):
        assert_eq!(payload.code, "empty_message");
        assert_eq!(payload.message, "message cannot be empty");
    }

    #[test]
    fn test_error_codes_are_stable() {
        // テスト項目: 各エラー種別のコードが仕様どおり
        // given (前提条件):

        // when (操作):
        // then (期待する結果):
        assert_eq!(EventError::IdentityInvalid("x".to_string()).code(), "identity_invalid");
        assert_eq!(EventError::NotAuthenticated("x").code(), "not_authenticated");
        assert_eq!(EventError::EmptyMessage.code(), "empty_message");
        assert_eq!(EventError::UnknownEvent("x".to_string()).code(), "unknown_event");
    }
}
