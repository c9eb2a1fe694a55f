//! aeroimpact server - live flight sampling and environmental estimates

use aeroimpact_server::{api, config::Config, state::AppState};
use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("aeroimpact_server=debug".parse()?);
    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting aeroimpact server...");
    tracing::debug!("OpenSky upstream: {:?}", config.opensky);
    if config.opensky.username.is_none() {
        tracing::warn!("OPENSKY_USERNAME is not set; snapshot fetches will be anonymous");
    }

    let port = config.server_port;
    let state = Arc::new(AppState::new(&config)?);

    let app = api::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
