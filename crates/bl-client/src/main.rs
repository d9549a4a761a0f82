//! bililive relay tail
//!
//! Connects to one room's live-chat relay and logs every frame received
//! until interrupted or disconnected.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bl_client::{Client, SessionEvent};
use bl_core::config::{self, ClientConfig};
use bl_protocol::{Operation, ProtocolVersion};

#[derive(Parser)]
#[command(name = "bl-client")]
#[command(about = "Tail the live-chat relay of a room")]
#[command(version)]
struct Args {
    /// Room id (short ids are resolved to the canonical room)
    room_id: u64,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| args.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration, falling back to defaults
    let config_path = args.config.unwrap_or_else(config::default_config_path);
    let config = if config_path.exists() {
        config::load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        ClientConfig::default()
    };

    // Resolve the room and open the session
    let client = Client::with_defaults(args.room_id, config).context("Failed to build client")?;
    let mut session = client
        .connect()
        .await
        .with_context(|| format!("Failed to connect to room {}", args.room_id))?;

    tracing::info!(
        room = %session.identity(),
        endpoint = %session.endpoint(),
        "streaming, press Ctrl-C to stop"
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
            event = session.next_event() => match event {
                Some(SessionEvent::Frame(frame)) => {
                    let op = frame
                        .op()
                        .map_or_else(|| frame.operation.to_string(), |op| format!("{:?}", op));
                    let version = ProtocolVersion::from_u16(frame.protocol_version)
                        .map_or_else(|| frame.protocol_version.to_string(), |v| format!("{:?}", v));
                    tracing::info!(%op, %version, len = frame.payload.len(), "frame");
                    if frame.op() == Some(Operation::HeartbeatReply) && frame.payload.len() >= 4 {
                        let popularity = u32::from_be_bytes([
                            frame.payload[0],
                            frame.payload[1],
                            frame.payload[2],
                            frame.payload[3],
                        ]);
                        tracing::info!(popularity, "heartbeat reply");
                    }
                }
                Some(SessionEvent::Malformed(e)) => {
                    tracing::warn!(error = %e, "dropping malformed frame");
                }
                Some(SessionEvent::Disconnected(error)) => {
                    tracing::warn!(%error, "disconnected");
                    break;
                }
                None => break,
            },
        }
    }

    session.close().await;
    Ok(())
}
