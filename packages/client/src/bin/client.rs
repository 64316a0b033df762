//! Listening room CLI client with reconnection support.
//!
//! Joins a room, renders playback, queue and chat events, and turns input
//! lines into room commands. Plain text is sent as chat; `/play [ms]`,
//! `/pause [ms]`, `/seek <ms>`, `/add <title> [- artist]`, `/leave` and
//! `/quit` control the room.
//! Automatically reconnects and re-joins on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin listening-room-client -- --room r1 --user-id u1 --username Alice
//! cargo run --bin listening-room-client -- -r r1 -i u2 -n Bob
//! ```

use clap::Parser;

use listening_room_client::{ClientIdentity, run_client};
use listening_room_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "listening-room-client")]
#[command(about = "CLI client for the live listening room server", long_about = None)]
struct Args {
    /// Room to join (created on demand)
    #[arg(short = 'r', long)]
    room: String,

    /// User ID for identifying this participant
    #[arg(short = 'i', long)]
    user_id: String,

    /// Display name (defaults to the user ID)
    #[arg(short = 'n', long)]
    username: Option<String>,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let identity = ClientIdentity {
        username: args.username.unwrap_or_else(|| args.user_id.clone()),
        room_id: args.room,
        user_id: args.user_id,
    };

    // Run the client
    if let Err(e) = run_client(args.url, identity).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
