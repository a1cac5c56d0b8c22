//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::domain::{Lobby, MessagePusher};
use crate::usecase::{
    AnnounceIdentityUseCase, DisconnectClientUseCase, JoinRoomUseCase, SendMessageUseCase,
    UpdateTypingUseCase,
};

use super::{
    handler::{health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat coordinator server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     announce_identity_usecase,
///     join_room_usecase,
///     send_message_usecase,
///     update_typing_usecase,
///     disconnect_client_usecase,
///     message_pusher,
///     lobby,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// AnnounceIdentityUseCase（アイデンティティ申告のユースケース）
    announce_identity_usecase: Arc<AnnounceIdentityUseCase>,
    /// JoinRoomUseCase（ルーム入室のユースケース）
    join_room_usecase: Arc<JoinRoomUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    send_message_usecase: Arc<SendMessageUseCase>,
    /// UpdateTypingUseCase（入力中シグナルのユースケース）
    update_typing_usecase: Arc<UpdateTypingUseCase>,
    /// DisconnectClientUseCase（切断処理のユースケース）
    disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// MessagePusher（接続ごとの送信チャンネルの管理）
    message_pusher: Arc<dyn MessagePusher>,
    /// コーディネータの状態テーブル
    lobby: Arc<Mutex<Lobby>>,
}

impl Server {
    /// Create a new Server instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        announce_identity_usecase: Arc<AnnounceIdentityUseCase>,
        join_room_usecase: Arc<JoinRoomUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        update_typing_usecase: Arc<UpdateTypingUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
        message_pusher: Arc<dyn MessagePusher>,
        lobby: Arc<Mutex<Lobby>>,
    ) -> Self {
        Self {
            announce_identity_usecase,
            join_room_usecase,
            send_message_usecase,
            update_typing_usecase,
            disconnect_client_usecase,
            message_pusher,
            lobby,
        }
    }

    /// Run the WebSocket chat coordinator server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            announce_identity_usecase: self.announce_identity_usecase,
            join_room_usecase: self.join_room_usecase,
            send_message_usecase: self.send_message_usecase,
            update_typing_usecase: self.update_typing_usecase,
            disconnect_client_usecase: self.disconnect_client_usecase,
            message_pusher: self.message_pusher,
            lobby: self.lobby,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "WebSocket chat coordinator listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
