//! Entry point for the `student-registry` HTTP server.

use anyhow::Result;
use clap::Parser;
use registry_server::tracing_setup::{self, TracingConfig};
use registry_server::{config, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Environment must be populated before clap reads its env fallbacks
    let dotenv = config::load_dotenv();
    let cli = Config::parse();

    tracing_setup::init_tracing(&TracingConfig { debug: cli.debug }).ok();
    config::log_dotenv(&dotenv);

    if let Err(e) = registry_server::serve(cli).await {
        tracing::error!("Fatal startup error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
