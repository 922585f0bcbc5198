use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use salonbook::config::AppConfig;
use salonbook::db::{self, SqliteStore};
use salonbook::handlers;
use salonbook::services::messaging::stub::LogMessagingProvider;
use salonbook::services::salon::Salon;
use salonbook::services::storage::Gateway;
use salonbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    let salon = Salon::load(Gateway::new(Box::new(SqliteStore::new(conn))));

    if config.admin_token == "changeme" {
        tracing::warn!("ADMIN_TOKEN is not set, using the default token");
    }

    let state = Arc::new(AppState {
        salon: Mutex::new(salon),
        config: config.clone(),
        messaging: Box::new(LogMessagingProvider),
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
