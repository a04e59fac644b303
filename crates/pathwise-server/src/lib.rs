//! Pathwise HTTP server.
//!
//! Exposes the dialog orchestrator and the individual decision services
//! (simulation, recommendation, ethics, memory) as JSON endpoints.

pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use axum::routing::{get, post};
use pathwise_core::config::ServerSettings;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/message", post(routes::message))
        .route("/chat/reset", post(routes::reset))
        .route("/dialog", get(routes::dialogs))
        .route("/dialog/:user_id", get(routes::dialog))
        .route("/planning/simulate", post(routes::simulate))
        .route("/planning/counterfactual", post(routes::counterfactual_analysis))
        .route("/rl/decide", post(routes::decide))
        .route("/ethics/validate", post(routes::validate))
        .route("/ethics/explain", post(routes::explain))
        .route("/memory/store", post(routes::store_memory))
        .route("/memory/retrieve", post(routes::retrieve_memories))
        .route("/memory/stats/:user_id", get(routes::memory_stats))
        .route("/events", get(routes::events))
        // Add middleware
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}

/// Binds `settings.bind_address()` and serves until Ctrl-C.
pub async fn serve(settings: &ServerSettings, state: AppState) -> anyhow::Result<()> {
    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Starting server on {}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
