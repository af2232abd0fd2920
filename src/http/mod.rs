//! HTTP surface: router construction and the serve loop.

pub mod routes;

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use crate::dal::Dal;

/// Build the admin API router over a shared DAL.
pub fn router(dal: Arc<Dal>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/admin/overview", get(routes::overview))
        .route("/api/admin/recent-news", get(routes::recent_news))
        .route("/api/admin/recent-events", get(routes::recent_events))
        .route("/api/admin/startups", get(routes::startups))
        .route("/api/admin/users", get(routes::users))
        .with_state(dal)
}

/// Bind and serve until SIGINT/SIGTERM, then close the pool.
pub async fn serve(dal: Arc<Dal>, bind_addr: &str) -> std::io::Result<()> {
    let app = router(dal.clone());
    let listener = TcpListener::bind(bind_addr).await?;
    info!(addr = %bind_addr, "admin API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_signal())
        .await?;

    info!("closing database pool");
    dal.close().await;
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn wait_for_signal() {
    let ctrl_c = signal::ctrl_c();

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
