// main.rs only boots the router and server

use booking_web::{logging, router, state::AppState};

use booking_core::storage::{DatabaseStorage, Storage};
use booking_core::DatabaseManager;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "booking-web")]
#[command(about = "Venue and artist booking directory server")]
#[command(version = "0.1.0")]
struct Cli {
    /// Port to listen on; falls back to PORT, then 3000
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    logging::init_logging();

    // Initialize database storage
    let db = DatabaseManager::new().await?;
    db.run_migrations().await?;
    let storage: Arc<dyn Storage> = Arc::new(DatabaseStorage::new(db));

    let app = router::app_router(AppState { storage });

    let port = cli
        .port
        .or_else(|| std::env::var("PORT").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(3000);
    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Booking directory listening on {}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
