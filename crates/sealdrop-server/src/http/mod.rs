// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP surface.
//
//   POST /api/encrypt       seal a fingerprinted message to the posted key
//   GET  /_status/livez     liveness
//   *                       404 `{ "error": ... }`
//
// Every failure, including those raised by middleware, answers with
// `{ "error": "<localized message>" }`.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::post;
use axum::Router;
use sealdrop_core::error::{Result, SealError};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;

use crate::AppServices;

pub mod encrypt;
mod health;
mod not_found;
mod rejection;

const API_PREFIX: &str = "/api";
const STATUS_PREFIX: &str = "/_status";

/// Build the router with all routes and middleware.
pub fn router(services: AppServices) -> Router {
    let max_body_bytes = services.config().max_body_bytes;
    let trace_layer = TraceLayer::new_for_http()
        .on_response(
            DefaultOnResponse::new()
                .include_headers(false)
                .level(tracing::Level::INFO)
                .latency_unit(LatencyUnit::Micros),
        )
        .on_failure(DefaultOnFailure::new().latency_unit(LatencyUnit::Micros));

    Router::new()
        .nest(STATUS_PREFIX, health::router())
        .route(&format!("{API_PREFIX}/encrypt"), post(encrypt::handler))
        .fallback(not_found::handler)
        .with_state(services.clone())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(middleware::map_response_with_state(
            services,
            rejection::json_errors,
        ))
        .layer(trace_layer)
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(services: AppServices) -> Result<()> {
    let listen_addr = services.config().listen_addr;
    let app = router(services);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(addr = %listen_addr, "sealdrop listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(SealError::Io)?;

    tracing::info!("sealdrop stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
