mod engine;
mod player;
mod source;
mod timer;
mod ui;

use clap::Parser;
use std::error::Error;
use tracing_subscriber::EnvFilter;

/// Application configuration from CLI
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Config {
    /// Pin a specific MPRIS service name instead of auto-discovering one
    #[arg(long)]
    pub player: Option<String>,
    /// Blocklist for MPRIS player service names (comma-separated, case-insensitive)
    #[arg(
        long = "block",
        value_name = "SERVICE1,SERVICE2",
        value_delimiter = ','
    )]
    pub block: Vec<String>,
    /// Frame interval of the synchronization loop, in milliseconds
    #[arg(long, default_value_t = 16)]
    pub refresh_ms: u64,
    /// Enable backend logging to stderr (level via RUST_LOG)
    #[arg(long)]
    pub debug_log: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player: None,
            block: vec![],
            refresh_ms: 16,
            debug_log: false,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cfg = Config::parse();

    if cfg.debug_log {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("lyricscreen=debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let result = ui::screen::run_screen(cfg.clone()).await;

    // Print error if any, for better diagnostics
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        return Err(e);
    }
    Ok(())
}
