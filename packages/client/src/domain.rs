//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Exit the client
    Quit,
    /// Switch to another room
    Join(String),
    /// Send a chat message to the current room
    Message(String),
}

/// Parse a line of user input into a command.
///
/// Lines starting with `/` are interpreted as slash commands (`/quit`,
/// `/join <room>`); everything else is a chat message. Empty lines and
/// malformed commands yield `None`.
pub fn parse_input(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(rest) = line.strip_prefix("/join") {
        let room = rest.trim();
        if room.is_empty() {
            return None;
        }
        return Some(Command::Join(room.to_string()));
    }

    if line == "/quit" {
        return Some(Command::Quit);
    }

    Some(Command::Message(line.to_string()))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
///
/// # Returns
///
/// `true` if reconnection should be attempted, `false` otherwise
pub fn should_attempt_reconnect(current_attempt: u32, max_attempts: u32) -> bool {
    current_attempt < max_attempts
}
