//! HTTP front end for the dispatcher.
//!
//! Successful scrapes answer 200 with the product record. Every failure uses
//! the same `{"error": "..."}` body, with the status picked from the error
//! kind by [`status_for`].

use std::net::SocketAddr;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::dispatcher::Dispatcher;
use crate::error::ScrapeError;
use crate::types::{ScrapeRequest, ScrapeResult};

pub fn router(dispatcher: Dispatcher) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/scrapers", get(list_scrapers))
        .route("/scrape", post(scrape))
        .route("/api/v1/scrapers", get(list_scrapers))
        .route("/api/v1/exec_scrape", post(scrape))
        .layer(cors)
        .with_state(dispatcher)
}

/// Serves the API until Ctrl-C.
pub async fn serve(addr: SocketAddr, dispatcher: Dispatcher) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(dispatcher))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

pub fn status_for(err: &ScrapeError) -> StatusCode {
    match err {
        ScrapeError::UnknownScraper(_) => StatusCode::NOT_FOUND,
        ScrapeError::PageFetch(_) => StatusCode::BAD_GATEWAY,
        ScrapeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ── Handlers ────────────────────────────────────────────────────

async fn health(State(dispatcher): State<Dispatcher>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "scrapers": dispatcher.registry().len(),
    }))
}

async fn list_scrapers(State(dispatcher): State<Dispatcher>) -> Json<Vec<&'static str>> {
    Json(dispatcher.scrapers())
}

async fn scrape(
    State(dispatcher): State<Dispatcher>,
    Json(request): Json<ScrapeRequest>,
) -> Response {
    match dispatcher.dispatch(&request.scraper_name, &request.url).await {
        Ok(product) => (StatusCode::OK, Json(ScrapeResult::Success(product))).into_response(),
        Err(e) => (status_for(&e), Json(ScrapeResult::failure(e.to_string()))).into_response(),
    }
}
