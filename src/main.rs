use anyhow::Context;
use dotenv::dotenv;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use admissions_backend::{app, app_state, clock, config, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenv().ok();

    let config = config::init()
        .context("Failed to load configuration")?
        .clone();

    let pool = db::init_pool()
        .await
        .context("Failed to initialize database pool")?;

    let (events_tx, _) = broadcast::channel::<String>(100);
    let events = Arc::new(Mutex::new(events_tx));

    let state = app_state::AppState::new(
        pool,
        config.clone(),
        events,
        Arc::new(clock::SystemClock),
    );

    let app = app::create_router(state);

    let addr = config.server_addr();
    info!("{} listening on {}", config.app.name, addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Failed to serve application")?;

    Ok(())
}
