use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use departure_server::config::AppConfig;
use departure_server::siri::{SiriClient, SiriConfig};
use departure_server::source::DepartureSource;
use departure_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    // Registry load is the one-time blocking setup step; polling must not
    // start without it.
    let http = reqwest::Client::new();
    let registry = match DepartureSource::load_registry(&http, &config.netex_url).await {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            error!("failed to load topology document: {e}");
            std::process::exit(1);
        }
    };

    let siri_config = SiriConfig::new(&config.siri_endpoint, &config.dataset_id)
        .with_max_stop_visits(config.max_stop_visits);
    let feed = match SiriClient::new(siri_config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("failed to create SIRI client: {e}");
            std::process::exit(1);
        }
    };

    let source = match DepartureSource::start(
        registry,
        feed,
        config.stops.clone(),
        config.poll_config(),
    ) {
        Ok(source) => source,
        Err(e) => {
            error!("failed to start polling: {e}");
            std::process::exit(1);
        }
    };

    let app = create_router(AppState::new(source));

    info!(addr = %config.bind_addr, "departure server listening");

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("failed to bind {}: {e}", config.bind_addr);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        std::process::exit(1);
    }
}
