//! ドメイン層
//!
//! コーディネータが管理する4つの状態テーブル（接続レジストリ、ルームメンバーシップ、
//! 現在ルームポインタ、タイピングトラッカー）と、それらを構成する値オブジェクト・
//! エンティティ、およびメッセージ送信の抽象（MessagePusher）を定義します。

mod entity;
mod lobby;
mod membership;
mod pusher;
mod registry;
mod typing;
mod value_object;

pub use entity::{ConnectedClient, RoomMember};
pub use lobby::Lobby;
pub use membership::{JoinOutcome, RoomMembership};
pub use pusher::{MessagePusher, OUTBOUND_QUEUE_CAPACITY, PusherChannel};
pub use registry::ConnectionRegistry;
pub use typing::TypingTracker;
pub use value_object::{
    ConnectionId, Identity, IdentityError, MessageBody, MessageBodyError, MessageId,
    MessageIdFactory, RoomId, Timestamp,
};

#[cfg(test)]
pub use pusher::MockMessagePusher;
