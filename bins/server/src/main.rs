//! Iltizam API Server
//!
//! Main entry point for the Iltizam commitments service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iltizam_api::{AppState, create_router};
use iltizam_db::{TenantRegistry, connect_sqlite, seed};
use iltizam_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "iltizam=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    tokio::fs::create_dir_all(&config.storage.data_dir).await?;

    // Open the master store and seed it on first boot
    let master_path = config.storage.master_path();
    let master = connect_sqlite(&master_path, config.storage.max_connections).await?;
    info!(path = %master_path.display(), "Opened master store");

    let report = seed::bootstrap(
        &master,
        &config.bootstrap.admin_username,
        &config.bootstrap.admin_password,
    )
    .await?;
    if report.admin_created {
        warn!(
            username = %config.bootstrap.admin_username,
            "Bootstrap administrator created, change its password"
        );
    }

    let tenants = Arc::new(TenantRegistry::new(
        config.storage.tenants_dir(),
        config.storage.max_connections,
    ));

    // Create JWT service
    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        #[allow(clippy::cast_possible_wrap)]
        access_token_expires_minutes: (config.jwt.access_token_expiry_secs / 60) as i64,
        #[allow(clippy::cast_possible_wrap)]
        refresh_token_expires_days: (config.jwt.refresh_token_expiry_secs / 86400) as i64,
    };
    let jwt_service = JwtService::new(jwt_config);

    // Create application state
    let state = AppState {
        master: Arc::new(master),
        tenants: Arc::clone(&tenants),
        jwt_service: Arc::new(jwt_service),
        bootstrap_admin: Arc::from(config.bootstrap.admin_username.as_str()),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tenants.shutdown().await?;
    info!("Tenant stores closed");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
