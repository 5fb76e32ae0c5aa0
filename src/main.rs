//! Company Intelligence Tool Service
//!
//! Entry point: loads configuration, sets up logging and serves the tool API.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use company_intel::config::AppConfig;
use company_intel::{server, telemetry};
use dotenvy::dotenv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing (M-LOG-STRUCTURED)
    telemetry::init(&config.telemetry);

    server::start_server(Arc::new(config)).await
}
