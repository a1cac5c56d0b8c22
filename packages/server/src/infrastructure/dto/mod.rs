//! Data Transfer Objects (DTOs) for the chat coordinator.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket wire events (inbound `ClientEvent`, outbound `ServerEvent`)
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
