//! Auth Proxy - Entry point.

use auth_proxy::{create_router, AppState, BaasClient, Config};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Auth Proxy");

    match &config.env_file {
        Some(path) => info!("Loaded environment from {}", path.display()),
        None => warn!(".env file not found or unreadable, using process environment"),
    }

    // Upstream credentials are required outside the hosting platform
    let baas = match config.credentials() {
        Ok(credentials) => match BaasClient::new(credentials, config.upstream_timeout()) {
            Ok(client) => Some(client),
            Err(e) => {
                error!("Failed to create upstream client: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            error!("{}", e);
            error!("Set them in a .env file or in the hosting platform's project settings");
            if !config.is_hosted() {
                std::process::exit(1);
            }
            warn!("Hosted environment detected, continuing without upstream credentials");
            None
        }
    };

    let app = create_router(AppState::new(baas));

    let addr = config.listen_addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET    /api/auth/test-connection - check upstream connectivity");
    info!("  POST   /api/auth/register        - register a user");

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
