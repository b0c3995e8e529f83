mod cleanup;
mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use jar_api::{AppState, AppStateInner, build_router};

use crate::config::Config;

/// Expired sessions are swept once an hour.
const SESSION_CLEANUP_SECS: u64 = 3600;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jar=debug,jar_api=debug,jar_db=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = jar_db::Database::open(&config.db_path)?;

    let session_ttl = chrono::TimeDelta::try_hours(i64::from(config.session_ttl_hours))
        .context("Invalid JAR_SESSION_TTL_HOURS")?;

    let state: AppState = Arc::new(AppStateInner {
        db,
        session_ttl,
        secure_cookies: config.secure_cookies,
    });

    tokio::spawn(cleanup::run_cleanup_loop(state.clone(), SESSION_CLEANUP_SECS));

    let app = build_router(state, &config.static_dir);

    let addr: SocketAddr = config.server_address().parse()?;
    info!("Memory Jar listening on {}", addr);
    info!("Sessions last {} hours", config.session_ttl_hours);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(signal) => signal,
                Err(e) => {
                    tracing::warn!("Failed to install SIGTERM handler: {}", e);
                    ctrl_c.await.ok();
                    info!("Received Ctrl+C, shutting down...");
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
