//! Real-time chat coordinator server.
//!
//! Tracks connected clients, room membership and typing state, and fans
//! messages and presence events out to room members over WebSocket.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroma-server
//! cargo run --bin hiroma-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;
use tokio::sync::Mutex;

use hiroma_server::{
    domain::{Lobby, MessagePusher},
    infrastructure::WebSocketMessagePusher,
    ui::Server,
    usecase::{
        AnnounceIdentityUseCase, DisconnectClientUseCase, JoinRoomUseCase, SendMessageUseCase,
        UpdateTypingUseCase,
    },
};
use hiroma_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroma-server")]
#[command(about = "Real-time presence and chat broadcast coordinator", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Lobby (the coordinator's state tables)
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create the Lobby (in-memory state tables, owned by this instance)
    let lobby = Arc::new(Mutex::new(Lobby::new()));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    let announce_identity_usecase = Arc::new(AnnounceIdentityUseCase::new(
        lobby.clone(),
        message_pusher.clone(),
    ));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(lobby.clone(), message_pusher.clone()));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        lobby.clone(),
        message_pusher.clone(),
    ));
    let update_typing_usecase = Arc::new(UpdateTypingUseCase::new(
        lobby.clone(),
        message_pusher.clone(),
    ));
    let disconnect_client_usecase = Arc::new(DisconnectClientUseCase::new(
        lobby.clone(),
        message_pusher.clone(),
    ));

    // 4. Create and run the server
    let server = Server::new(
        announce_identity_usecase,
        join_room_usecase,
        send_message_usecase,
        update_typing_usecase,
        disconnect_client_usecase,
        message_pusher,
        lobby,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
