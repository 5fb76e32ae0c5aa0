use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::{Value, json};

use super::error::ApiError;
use crate::AppState;
use crate::tools::{ToolDescriptor, ToolOutput, registry::describe};

pub fn build_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/tools/{tool_name}", get(describe_tool))
        .route("/tools/{tool_name}/call", post(call_tool))
}

/// GET /health - Liveness probe.
async fn health() -> Json<Value> {
    tracing::debug!("Health check endpoint was called");
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Serialize)]
struct ToolList {
    tools: Vec<String>,
}

/// GET /tools - Names of all registered tools.
async fn list_tools(State(state): State<AppState>) -> Json<ToolList> {
    let tools = state
        .dispatcher
        .registry()
        .names()
        .into_iter()
        .map(str::to_string)
        .collect();
    Json(ToolList { tools })
}

/// GET /tools/{tool_name} - Description and JSON Schema of one tool.
async fn describe_tool(
    State(state): State<AppState>,
    Path(tool_name): Path<String>,
) -> Result<Json<ToolDescriptor>, ApiError> {
    let tool = state.dispatcher.registry().lookup(&tool_name)?;
    Ok(Json(describe(tool.as_ref())))
}

/// POST /tools/{tool_name}/call - Validate the body and run the tool.
///
/// The body is taken raw so that tool resolution happens before JSON parsing.
async fn call_tool(
    State(state): State<AppState>,
    Path(tool_name): Path<String>,
    body: Bytes,
) -> Result<Json<ToolOutput>, ApiError> {
    let output = state.dispatcher.call_json(&tool_name, &body).await?;
    Ok(Json(output))
}
