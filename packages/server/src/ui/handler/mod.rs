//! UI 層のハンドラ
//!
//! - `websocket`: WebSocket アップグレードとイベントディスパッチ
//! - `http`: HTTP エンドポイント（ヘルスチェック）

mod http;
mod websocket;

pub use http::health_check;
pub use websocket::websocket_handler;
