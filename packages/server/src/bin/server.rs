//! Hiroba broadcast hub server.
//!
//! Every message a participant sends is fanned out to all connected
//! participants, together with join and leave announcements.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000 --no-echo
//! ```

use clap::Parser;
use hiroba_server::{config::ServerConfig, ui::Server};
use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Real-time message broadcast hub over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Capacity of the shared inbound queue
    #[arg(long, default_value = "100")]
    inbound_capacity: usize,

    /// Capacity of each participant's outbound queue
    #[arg(long, default_value = "10")]
    outbound_capacity: usize,

    /// Do not deliver chat messages back to their sender
    #[arg(long)]
    no_echo: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            inbound_capacity: args.inbound_capacity,
            outbound_capacity: args.outbound_capacity,
            echo_to_sender: !args.no_echo,
            ..ServerConfig::default()
        }
    }
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let server = Server::new(ServerConfig::from(args));
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
