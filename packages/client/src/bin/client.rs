//! Hiroba chat client.
//!
//! Joins the broadcast hub, prints every message with its local time, and
//! sends each line typed at the prompt. Reconnects on connection loss (max 5
//! attempts with 5 second interval) unless the server rejected the join.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-client -- --name Alice
//! cargo run --bin hiroba-client -- -i alice -n Alice -u ws://127.0.0.1:3000/ws
//! ```

use clap::Parser;
use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroba-client")]
#[command(about = "Interactive chat client for the Hiroba broadcast hub", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Participant id (must be unique among connected participants); random when omitted
    #[arg(short = 'i', long)]
    participant_id: Option<String>,

    /// Display name; defaults to the participant id
    #[arg(short = 'n', long, default_value = "")]
    name: String,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let participant_id = args
        .participant_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let name = if args.name.trim().is_empty() {
        participant_id.clone()
    } else {
        args.name
    };

    if let Err(e) = hiroba_client::run_client(args.url, participant_id, name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
