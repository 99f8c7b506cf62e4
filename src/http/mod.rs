//! HTTP transport: maps record routes onto a `RecordService`.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET  /api/v1/records/:id`: latest version (`400` if absent).
//! - `POST /api/v1/records/:id`: create, or merge onto the latest version.
//! - `GET  /api/v2/records/:id?versions=all|latest|v1,v2,...`: history reads.
//! - `POST /api/v2/records/:id`: always append a new version.
//! - `GET  /health`: `{ "ok": true }`.
//!
//! Both API generations share one version history. POST bodies are JSON
//! objects whose values are strings (set) or `null` (delete).
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use timetravel::{http, InMemoryVersionStore, RecordService};
//!
//! let service = Arc::new(RecordService::new(InMemoryVersionStore::new()));
//!
//! // Get the router to compose with other axum routes
//! let app = http::router(service.clone());
//!
//! // Or serve directly until SIGINT/SIGTERM
//! http::serve(service, "127.0.0.1:8000".parse()?).await?;
//! ```

mod error;
mod v1;
mod v2;
mod versions;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::error::RecordError;
use crate::service::RecordService;
use crate::store::VersionStore;

pub use error::ApiError;
pub use versions::VersionsQuery;

/// Build an axum `Router` serving both API generations and `/health`.
pub fn router<S: VersionStore + 'static>(service: Arc<RecordService<S>>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", v1::routes(service.clone()))
        .nest("/api/v2", v2::routes(service))
}

/// Serve the service at `addr` until SIGINT (or SIGTERM on Unix).
pub async fn serve<S: VersionStore + 'static>(
    service: Arc<RecordService<S>>,
    addr: SocketAddr,
) -> Result<(), std::io::Error> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

/// `GET /health`: returns `{ "ok": true }`.
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

/// Run a store operation on the blocking pool.
///
/// Store calls may block on disk I/O, so they never run on the async
/// workers. If the request is dropped the call still runs to completion.
async fn run_blocking<S, T, F>(service: Arc<RecordService<S>>, f: F) -> Result<T, RecordError>
where
    S: VersionStore + 'static,
    T: Send + 'static,
    F: FnOnce(&RecordService<S>) -> Result<T, RecordError> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || f(&service)).await {
        Ok(result) => result,
        Err(e) => Err(RecordError::Storage(crate::store::StoreError::Io(
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
        ))),
    }
}

/// Waits for SIGINT on all platforms, plus SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to register SIGTERM handler");
                ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    ctrl_c.await;

    tracing::info!("shutdown signal received");
}
