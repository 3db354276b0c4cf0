mod config;
mod error;
mod routes;
mod services;
mod state;

use crate::config::AppConfig;
use crate::services::verify_scheduler::VerifyScheduler;
use crate::state::AppState;
use backup_orchestrator::clock::SystemClock;
use backup_orchestrator::control_plane::HttpControlPlane;
use backup_orchestrator::{Config, Orchestrator};
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .init();

    tracing::info!("Starting backup orchestrator server on port {}", config.port);

    let orchestrator_config = Config::load(config.orchestrator_config.as_deref())?;
    let control_plane = HttpControlPlane::new(&orchestrator_config.control_plane)?;
    tracing::info!(
        url = %control_plane.base_url(),
        vault = %orchestrator_config.vault.name,
        "Using control plane API"
    );

    let orchestrator = Orchestrator::new(
        &orchestrator_config,
        Arc::new(control_plane),
        Arc::new(SystemClock),
    );
    let state = Arc::new(AppState::new(config.clone(), orchestrator));

    // Scheduled verification is optional
    let scheduler = match &config.verify_schedule {
        Some(cron) => match VerifyScheduler::new(state.clone()).await {
            Ok(s) => {
                if let Err(e) = s.schedule(cron).await {
                    tracing::warn!("Failed to schedule verification: {}", e);
                }
                if let Err(e) = s.start().await {
                    tracing::warn!("Failed to start scheduler: {}", e);
                }
                Some(s)
            }
            Err(e) => {
                tracing::warn!("Failed to create scheduler: {}", e);
                None
            }
        },
        None => None,
    };

    let app = routes::create_router(state.clone());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down...");

    if let Some(s) = scheduler {
        if let Err(e) = s.shutdown().await {
            tracing::warn!("Scheduler shutdown error: {}", e);
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl+c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}
