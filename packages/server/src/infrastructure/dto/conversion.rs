//! Conversion logic between DTOs and domain entities.

use hiroma_shared::time::timestamp_to_rfc3339;

use crate::domain::RoomMember;
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<RoomMember> for dto::RoomUserDto {
    fn from(member: RoomMember) -> Self {
        Self {
            username: member.identity.username().to_string(),
            user_id: member.identity.user_id().to_string(),
            joined_at: timestamp_to_rfc3339(member.joined_at.value()),
        }
    }
}

/// メンバーのスナップショットを DTO のリストへ変換
pub fn room_users(members: Vec<RoomMember>) -> Vec<dto::RoomUserDto> {
    members.into_iter().map(dto::RoomUserDto::from).collect()
}
