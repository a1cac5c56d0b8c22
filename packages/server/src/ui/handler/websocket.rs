//! WebSocket connection handlers.
//!
//! アップグレード時に接続 ID を採番し、接続ごとに受信ループと送信ループの
//! タスクペアを起動します。受信したテキストフレームは Event Router
//! （UseCase 層）へディスパッチされ、トランスポートのクローズは切断処理の
//! 唯一のトリガーになります。

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::domain::{ConnectionId, OUTBOUND_QUEUE_CAPACITY, RoomId};
use crate::infrastructure::dto::websocket::{ClientEvent, ServerEvent};
use crate::usecase::EventError;

use super::super::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // 接続 ID はトランスポート層がここで採番する（クライアントは関与しない）
    let connection_id = ConnectionId::generate();
    ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: events addressed to this
/// connection (via its per-connection queue) are sent to the WebSocket.
///
/// # Arguments
///
/// * `rx` - Channel receiver for this connection's outbound queue
/// * `sender` - WebSocket sink to send messages to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let (sender, mut receiver) = socket.split();

    // Create the per-connection outbound queue and register it, so that error
    // payloads can be delivered even before the client announces an identity
    let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
    state
        .message_pusher
        .register_client(connection_id.clone(), tx)
        .await;
    tracing::info!("New connection '{}'", connection_id);

    // Spawn a task to deliver this connection's outbound queue
    let mut send_task = pusher_loop(rx, sender);

    let connection_id_clone = connection_id.clone();
    let state_clone = state.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    dispatch_event(&state_clone, &connection_id_clone, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // トランスポートのクローズが唯一の切断シグナル。状態の掃除と退室通知は
    // UseCase が行い、送信チャンネルのライフサイクルはこのハンドラが握る
    state.disconnect_client_usecase.execute(&connection_id).await;
    state
        .message_pusher
        .unregister_client(&connection_id)
        .await;
    tracing::info!("Connection '{}' closed", connection_id);
}

/// 受信したテキストフレームを Event Router へディスパッチ
///
/// イベント処理のエラーは全て非致命的で、エラーペイロードを本人にのみ送り返し、
/// 接続は開いたまま維持されます。
async fn dispatch_event(state: &Arc<AppState>, connection_id: &ConnectionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Unparsable event from '{}': {}", connection_id, e);
            let error = EventError::UnknownEvent(e.to_string());
            let payload = ServerEvent::Error(error.to_payload());
            state
                .message_pusher
                .unicast(connection_id, &payload.to_json())
                .await;
            return;
        }
    };

    let result = match event {
        ClientEvent::Announce(payload) => {
            state
                .announce_identity_usecase
                .execute(connection_id, payload.user_id, payload.username)
                .await
        }
        ClientEvent::JoinRoom(payload) => {
            state
                .join_room_usecase
                .execute(connection_id, RoomId::new(payload.room_id))
                .await
        }
        ClientEvent::SendMessage(payload) => {
            state
                .send_message_usecase
                .execute(connection_id, payload.text)
                .await
        }
        ClientEvent::StartTyping => {
            state
                .update_typing_usecase
                .execute(connection_id, true)
                .await
        }
        ClientEvent::StopTyping => {
            state
                .update_typing_usecase
                .execute(connection_id, false)
                .await
        }
    };

    if let Err(error) = result {
        tracing::warn!("Event from '{}' rejected: {}", connection_id, error);
        let payload = ServerEvent::Error(error.to_payload());
        state
            .message_pusher
            .unicast(connection_id, &payload.to_json())
            .await;
    }
}
