use log::{error, info, warn};
use std::net::SocketAddr;

use shine_store::config::ServerConfig;
use shine_store::handlers::{routes, AppState};
use shine_store::security_logger::SecurityLogger;

#[tokio::main]
async fn main() {
    // Initialize env
    let dotenv_result = dotenvy::dotenv();

    // Initialize logging
    env_logger::init();

    match dotenv_result {
        Ok(path) => info!("Environment variables loaded from {}", path.display()),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Load config once; it is immutable from here on
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, token_ttl={}s, store={}",
        config.host,
        config.port,
        config.token_ttl.as_secs(),
        config.database_url
    );

    let state = match AppState::from_config(&config, SecurityLogger::shared()).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize services: {}", e);
            std::process::exit(1);
        }
    };

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting Shine Store API on http://{}", addr);

    warp::serve(routes(state)).run(addr).await;
}
