// =============================================================================
// GangaWatch Dashboard - Server Entry Point
// =============================================================================

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gangawatch_dashboard::config::{Cli, Config};
use gangawatch_dashboard::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // .env must be loaded before clap reads env-backed flags
    if dotenvy::dotenv().is_err() {
        tracing::debug!("No .env file found");
    }

    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;
    let bind_addr = config.bind_address.clone();

    tracing::info!(
        data_root = %config.data_root.display(),
        max_table_rows = config.max_table_rows,
        "Configuration loaded"
    );

    let app = create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Water quality dashboard running on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
