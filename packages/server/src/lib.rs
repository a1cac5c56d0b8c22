//! Real-time presence, room-membership and broadcast coordinator.
//!
//! Tracks which clients are connected, which room each client currently
//! occupies and who is typing, and fans messages and presence events out to
//! the right set of recipients over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
