use anyhow::Result;
use clap::Parser;
use common::{AppConfig, telemetry::init_tracing};
use tracing::info;

mod app;
mod cli;

use crate::{app::App, cli::Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging
    init_tracing();
    info!(api_url = %config.api_url, "Starting capsule client");

    let app = App::bootstrap(config).await?;
    app.run(cli.command).await
}
