use axum::{Router, extract::DefaultBodyLimit};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};

use crate::AppState;
use crate::api;
use crate::config::AppConfig;

/// Assemble the router with its middleware stack.
pub fn build_app(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;

    api::router()
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    log_service_config(&config);

    let state = AppState::new(Arc::clone(&config))?;

    for tool in state.dispatcher.registry().descriptors() {
        info!(
            name: "tool.discovered",
            tool = %tool.name,
            description = %tool.description,
            "Tool available"
        );
    }

    let app = build_app(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(name: "server.stopped", "Server stopped");
    Ok(())
}

/// Project id and secret are reported as present or absent, never by value.
fn log_service_config(config: &AppConfig) {
    info!(
        name: "service.config.loaded",
        project_id_configured = config.service.project_id.is_some(),
        secret_configured = config.security.has_secret(),
        tool_timeout = ?config.resilience.tool_timeout(),
        "Service configuration loaded"
    );
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
