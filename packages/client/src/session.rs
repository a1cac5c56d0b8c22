//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use hiroma_server::infrastructure::dto::websocket::{
    AnnouncePayload, ClientEvent, JoinRoomPayload, SendMessagePayload, ServerEvent,
};

use crate::domain::{Command, parse_input};
use crate::error::ClientError;
use crate::formatter::MessageFormatter;
use crate::ui::redisplay_prompt;

/// Run the WebSocket client session
pub async fn run_client_session(
    url: &str,
    user_id: &str,
    username: &str,
    room_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to chat server!");
    println!(
        "\nYou are '{}'. Type messages and press Enter to send.\n\
         Use /join <room> to switch rooms, /quit or Ctrl+C to exit.\n",
        username
    );

    let (mut write, mut read) = ws_stream.split();

    // Announce the identity, then join the initial room
    let announce = ClientEvent::Announce(AnnouncePayload {
        user_id: user_id.to_string(),
        username: username.to_string(),
    });
    write
        .send(Message::Text(serde_json::to_string(&announce)?.into()))
        .await?;
    let join = ClientEvent::JoinRoom(JoinRoomPayload {
        room_id: room_id.to_string(),
    });
    write
        .send(Message::Text(serde_json::to_string(&join)?.into()))
        .await?;

    // Clone username for read task
    let username_for_read = username.to_string();

    // Spawn a task to handle incoming events
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(ServerEvent::ConnectionConfirmed(payload)) => {
                            MessageFormatter::format_connection_confirmed(&payload.message)
                        }
                        Ok(ServerEvent::RoomJoined(payload)) => {
                            MessageFormatter::format_room_joined(&payload.message)
                        }
                        Ok(ServerEvent::RoomUsersUpdate(payload)) => {
                            MessageFormatter::format_room_users(
                                &payload.room_users,
                                &username_for_read,
                            )
                        }
                        Ok(ServerEvent::UserJoined(payload)) => {
                            MessageFormatter::format_user_joined(&payload.message, &payload.timestamp)
                        }
                        Ok(ServerEvent::UserLeft(payload)) => {
                            MessageFormatter::format_user_left(&payload.message, &payload.timestamp)
                        }
                        Ok(ServerEvent::NewMessage(payload)) => MessageFormatter::format_chat_message(
                            &payload.username,
                            &payload.text,
                            &payload.timestamp,
                        ),
                        Ok(ServerEvent::UserTyping(payload)) => {
                            MessageFormatter::format_typing(&payload.typing_snapshot)
                        }
                        Ok(ServerEvent::Error(payload)) => {
                            MessageFormatter::format_error(&payload.code, &payload.message)
                        }
                        // If parsing fails, display as raw text
                        Err(_) => MessageFormatter::format_raw_message(&text),
                    };
                    print!("{}", formatted);
                    redisplay_prompt(&username_for_read);
                }
                Ok(Message::Binary(data)) => {
                    let formatted = MessageFormatter::format_binary_message(data.len());
                    print!("{}", formatted);
                    redisplay_prompt(&username_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let username_for_prompt = username.to_string();
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", username_for_prompt);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to handle stdin input and send events to the coordinator
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            let event = match parse_input(&line) {
                Some(Command::Quit) => break,
                Some(Command::Join(room)) => {
                    ClientEvent::JoinRoom(JoinRoomPayload { room_id: room })
                }
                Some(Command::Message(text)) => {
                    ClientEvent::SendMessage(SendMessagePayload { text })
                }
                None => continue,
            };

            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize event: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send event: {}", e);
                write_error = true;
                break;
            }
            // The coordinator echoes new_message back to the sender, so the
            // read task displays our own message once it is delivered
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            let connection_error = read_result.unwrap_or(false);
            if connection_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            let write_error = write_result.unwrap_or(false);
            if write_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
    }

    Ok(())
}
