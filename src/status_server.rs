// SPDX-License-Identifier: MIT

//! Status endpoint (C12): loopback HTTP server serving `/health` and
//! `/stats`. Built on `axum`, the pack's HTTP-server crate of choice.
//! Access logging is deliberately not layered on here per spec.md §4.12.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::AgentError;
use crate::status::Status;

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

async fn stats(State(status): State<Arc<Status>>) -> impl IntoResponse {
    Json(status.snapshot())
}

fn router(status: Arc<Status>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stats", get(stats))
        .with_state(status)
}

/// Bind the status server and serve it until the process exits or
/// `shutdown` is notified.
pub async fn run(
    host: String,
    port: u16,
    status: Arc<Status>,
    shutdown: Arc<tokio::sync::Notify>,
) -> Result<(), AgentError> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], port)));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AgentError::StatusBind {
            addr: addr.to_string(),
            source: e,
        })?;

    axum::serve(listener, router(status))
        .with_graceful_shutdown(async move { shutdown.notified().await })
        .await
        .ok();

    Ok(())
}
