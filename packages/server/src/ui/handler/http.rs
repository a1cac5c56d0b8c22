//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use hiroma_shared::time::{get_utc_timestamp, timestamp_to_rfc3339};

use crate::infrastructure::dto::http::HealthDto;

use super::super::state::AppState;

/// Health check endpoint
///
/// 読み取り専用の死活監視。announce 済み接続数と、在室メンバーのいるルーム数を
/// 返します。
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    let lobby = state.lobby.lock().await;
    Json(HealthDto {
        status: "ok".to_string(),
        timestamp: timestamp_to_rfc3339(get_utc_timestamp()),
        connected_users: lobby.connected_clients(),
        active_rooms: lobby.active_rooms(),
    })
}
