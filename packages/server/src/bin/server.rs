//! Live listening room server.
//!
//! Clients join rooms over WebSocket and share one playback cursor, a track
//! queue and a chat.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin listening-room-server
//! cargo run --bin listening-room-server -- --host 0.0.0.0 --port 3000
//! cargo run --bin listening-room-server -- --max-participants-per-room 20 --max-queue-length 100
//! ```

use std::sync::Arc;

use clap::Parser;
use listening_room_server::{
    config::{DEFAULT_MAX_CHAT_CHARS, DEFAULT_MAX_USERNAME_CHARS, FrameLimits, ServerConfig},
    domain::RoomLimits,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::Server,
    usecase::{GetRoomDetailUseCase, GetRoomsUseCase, RoomCoordinator},
};
use listening_room_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "listening-room-server")]
#[command(about = "Live listening room server with synchronized playback", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Chat messages longer than this many characters are truncated
    #[arg(long, default_value_t = DEFAULT_MAX_CHAT_CHARS)]
    max_chat_chars: usize,

    /// Usernames longer than this many characters are truncated
    #[arg(long, default_value_t = DEFAULT_MAX_USERNAME_CHARS)]
    max_username_chars: usize,

    /// Maximum participants per room (unbounded when omitted)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_participants_per_room: Option<u32>,

    /// Maximum tracks in a room's queue (unbounded when omitted)
    #[arg(long)]
    max_queue_length: Option<usize>,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            frame_limits: FrameLimits {
                max_chat_chars: args.max_chat_chars,
                max_username_chars: args.max_username_chars,
            },
            room_limits: RoomLimits {
                max_participants: args.max_participants_per_room.map(|max| max as usize),
                max_queue_length: args.max_queue_length,
            },
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = ServerConfig::from(Args::parse());
    tracing::debug!("Starting with {:?}", config);

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create Repository (in-memory room registry)
    let repository = Arc::new(InMemoryRoomRepository::with_limits(config.room_limits));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    let coordinator = Arc::new(RoomCoordinator::new(
        repository.clone(),
        message_pusher,
        Arc::new(SystemClock),
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(repository.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(repository));

    // 4. Create and run the server
    let server = Server::new(
        coordinator,
        get_rooms_usecase,
        get_room_detail_usecase,
        config.frame_limits,
    );
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
