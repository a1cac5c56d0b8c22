//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// ヘルスチェックのレスポンス
///
/// 読み取り専用の死活監視。announce 済み接続数と、在室メンバーのいるルーム数を
/// 返します（状態を変更しない）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDto {
    pub status: String,
    pub timestamp: String,
    pub connected_users: usize,
    pub active_rooms: usize,
}
