//! Wayfare Gateway - HTTP proxy between browser clients and the API
//!
//! This is the main entry point for the gateway service.
//!
//! # Configuration
//!
//! The downstream address comes from `INTERNAL_API_URL`, falling back to
//! `NEXT_PUBLIC_API_URL` and then `http://localhost:5000`. `NODE_ENV=production`
//! marks the session cookie `Secure`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wayfare_gateway::{create_router, GatewayConfig, GatewayState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wayfare=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Wayfare Gateway");

    let config = GatewayConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        environment = %config.environment,
        api_url = %config.addresses.api,
        images_url = %config.addresses.images,
        protected_prefixes = ?config.guard.protected_prefixes,
        "Gateway configuration loaded"
    );

    let listen_addr = config.listen_addr.clone();
    let state = GatewayState::new(config)?;

    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
