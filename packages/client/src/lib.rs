//! CLI chat client for the Hiroma chat coordinator.
//!
//! Connects to the coordinator over WebSocket, announces an identity, joins a
//! room, and exchanges messages and presence events from the terminal.

mod domain;
mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use error::ClientError;
pub use runner::run_client;
