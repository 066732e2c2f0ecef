use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

use crate::api::{build_router, AppState, Store};
use crate::config::AppConfig;
use crate::core::admin::{seed_admin, SeedOutcome};
use crate::utils::error::{PortfolioError, Result};

/// Connects every backend, seeds the admin account when configured and serves
/// the API until Ctrl+C or SIGTERM.
pub async fn run(config: AppConfig) -> Result<()> {
    info!("Initializing state...");
    let state = AppState::from_config(&config).await?;

    if let Some(admin) = &config.admin {
        seed_admin(state.users.as_ref(), &admin.email, &admin.password).await?;
    }

    serve(state, &config).await
}

pub async fn serve(state: Arc<AppState>, config: &AppConfig) -> Result<()> {
    let app = build_router(state, &config.server);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("🚀 Server running on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// One-shot `seed-admin` command: only the user store is opened.
pub async fn seed_admin_command(config: &AppConfig) -> Result<SeedOutcome> {
    let admin = config
        .admin
        .as_ref()
        .ok_or_else(|| PortfolioError::MissingConfigError {
            field: "admin".to_string(),
        })?;

    let store = Store::open(&config.database).await?;
    seed_admin(store.users.as_ref(), &admin.email, &admin.password).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
