mod handlers;
mod models;
mod routes;
mod utils;
use axum::serve;
use routes::{init_tracing, make_app};
use std::{error::Error, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};
use utils::{config::Config, state::AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    init_tracing();

    info!("Initializing application...");
    let config = Config::init()?;
    info!("Configuration loaded successfully");

    let state = Arc::new(AppState::init(config)?);
    let app = make_app(state.clone());

    let addr = state.config.bind_addr.clone();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("failed to bind {}: {}", addr, err);
            return Err(err.into());
        }
    };
    info!("Listening on http://{}", addr);

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.cache.close();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
}
