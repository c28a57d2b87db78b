//! Tender Backend
//! Mission: Admin login plus JWT-protected CRUD over tender records

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tender_backend::{
    auth::{AuthState, JwtHandler, StaticCredentials},
    create_router,
    tenders::TenderStore,
    Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    let _ = dotenv();
    init_tracing();

    let config = Config::parse();

    info!("🚀 Tender backend starting ({:?})", config.app_env);

    // Authentication: one admin credential, hashed once at startup
    let jwt_secret = config.resolve_jwt_secret()?;
    let credentials = Arc::new(StaticCredentials::admin_default(config.bcrypt_cost)?);
    let jwt_handler = Arc::new(JwtHandler::new(&jwt_secret));
    let auth_state = AuthState::new(credentials, jwt_handler);

    let store = Arc::new(
        TenderStore::new(&config.database_path).context("Failed to open tender store")?,
    );

    let app = create_router(auth_state, store);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🎯 Server running on port {}", config.port);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Initialize tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tender_backend=debug,tender_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
