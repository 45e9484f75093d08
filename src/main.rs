// src/main.rs

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use folio_relay::config::{RelayArgs, RelayConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win
    let _ = dotenvy::dotenv();

    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = RelayConfig::from_args(RelayArgs::parse())?;
    folio_relay::server::run(config).await
}
