//! CLI chat client with reconnection support.
//!
//! Connects to the chat coordinator, announces an identity, joins a room, and
//! sends messages from stdin. Displays a prompt and waits for input.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second
//! interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroma-client -- --user-id 1 --username ann --room general
//! cargo run --bin hiroma-client -- -i 2 -n bob -r general
//! ```

use clap::Parser;

use hiroma_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroma-client")]
#[command(about = "CLI chat client for the Hiroma coordinator", long_about = None)]
struct Args {
    /// User ID issued by the account service
    #[arg(short = 'i', long)]
    user_id: String,

    /// Display name for chat messages
    #[arg(short = 'n', long)]
    username: String,

    /// Room to join after connecting
    #[arg(short = 'r', long, default_value = "general")]
    room: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) =
        hiroma_client::run_client(args.url, args.user_id, args.username, args.room).await
    {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
