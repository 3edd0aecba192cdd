use clap::Parser;
use sems_api::{config::load_station_config, create_app};
use sems_engine::Engine;
use std::path::PathBuf;

/// Command line arguments for the sems server
#[derive(Parser, Debug)]
#[command(name = "sems")]
#[command(about = "Electra Station Energy Management System")]
struct Args {
    /// Path to the station configuration JSON file
    #[arg(short, long)]
    config: PathBuf,

    /// Port to bind the server to
    #[arg(short, long, default_value = "3000")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt().pretty().init();

    let station_config = load_station_config(&args.config).await?;
    tracing::info!(
        "Loaded station config from {}: {}",
        args.config.display(),
        station_config.station_id
    );

    let engine = Engine::new(station_config)?;
    let app = create_app(engine);

    let bind_addr = format!("0.0.0.0:{}", args.port);
    tracing::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", bind_addr, e))?;

    axum::serve(listener, app).await?;

    Ok(())
}
