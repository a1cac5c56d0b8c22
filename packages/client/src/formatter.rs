//! Message formatting utilities for client display.

use hiroma_server::infrastructure::dto::websocket::RoomUserDto;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the room user list showing all members
    ///
    /// # Arguments
    ///
    /// * `room_users` - List of members in the room
    /// * `current_username` - The current user's name (to mark as "me")
    ///
    /// # Returns
    ///
    /// A formatted string with the member list
    pub fn format_room_users(room_users: &[RoomUserDto], current_username: &str) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str("Room members:\n");

        if room_users.is_empty() {
            output.push_str("(No members)\n");
        } else {
            for user in room_users {
                let is_me = user.username == current_username;
                let me_suffix = if is_me { " (me)" } else { "" };
                output.push_str(&format!(
                    "{}{} - joined at {}\n",
                    user.username, me_suffix, user.joined_at
                ));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a connection confirmation from the server
    pub fn format_connection_confirmed(message: &str) -> String {
        format!("\n* {}\n", message)
    }

    /// Format the room-joined confirmation
    pub fn format_room_joined(message: &str) -> String {
        format!("\n* {}\n", message)
    }

    /// Format a user-joined notification
    ///
    /// # Arguments
    ///
    /// * `message` - The human-readable system message ("X joined the room")
    /// * `timestamp` - RFC 3339 timestamp assigned by the coordinator
    pub fn format_user_joined(message: &str, timestamp: &str) -> String {
        format!("\n+ {} at {}\n", message, timestamp)
    }

    /// Format a user-left notification
    pub fn format_user_left(message: &str, timestamp: &str) -> String {
        format!("\n- {} at {}\n", message, timestamp)
    }

    /// Format a chat message
    ///
    /// # Arguments
    ///
    /// * `from` - The username of the sender
    /// * `text` - The message text
    /// * `timestamp` - RFC 3339 timestamp assigned by the coordinator
    pub fn format_chat_message(from: &str, text: &str, timestamp: &str) -> String {
        format!(
            "\n\n------------------------------------------------------------\n\
             @{}: {}\n\
             sent at {}\n\
             ------------------------------------------------------------\n",
            from, text, timestamp
        )
    }

    /// Format a typing indicator update
    ///
    /// Shows the full set of currently typing users so a stale indicator can
    /// never survive a missed start/stop pair.
    pub fn format_typing(typing_snapshot: &[String]) -> String {
        if typing_snapshot.is_empty() {
            "\n* nobody is typing\n".to_string()
        } else {
            format!("\n* typing: {}\n", typing_snapshot.join(", "))
        }
    }

    /// Format an error payload from the server
    pub fn format_error(code: &str, message: &str) -> String {
        format!("\n! error [{}]: {}\n", code, message)
    }

    /// Format a binary message notification
    ///
    /// # Arguments
    ///
    /// * `byte_count` - The number of bytes received
    ///
    /// # Returns
    ///
    /// A formatted string with the binary data notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    ///
    /// # Arguments
    ///
    /// * `text` - The raw text received
    ///
    /// # Returns
    ///
    /// A formatted string with the raw message
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
