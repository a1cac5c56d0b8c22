//! UseCase 層（Event Router）
//!
//! インバウンドイベント1種類につき1つのユースケースを定義します。各ユースケースは
//! 前提条件の検証 → 状態テーブルの変更 → ブロードキャスト先の決定と送信、を行う
//! コーディネータの心臓部です。
//!
//! ## 直列化の規律
//!
//! 4つの状態テーブルは単一の `Mutex<Lobby>` の中にあり、各ユースケースは
//! **ロックを保持したまま**変更・スナップショット取得・ブロードキャストの
//! enqueue まで行います。enqueue は有界キューへの `try_send` でありブロック
//! しないため、ロックを I/O で保持し続けることはありません。これにより全ルームを
//! 通した単一の全順序が得られ、同じルームの観測者が「状態変更とその通知の間に
//! 別イベントの通知が割り込んだ（古いスナップショットが届く）」状況は発生しません。

mod announce_identity;
mod disconnect_client;
mod error;
mod join_room;
mod send_message;
mod update_typing;

pub use announce_identity::AnnounceIdentityUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::EventError;
pub use join_room::JoinRoomUseCase;
pub use send_message::SendMessageUseCase;
pub use update_typing::UpdateTypingUseCase;
