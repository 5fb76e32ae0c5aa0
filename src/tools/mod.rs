//! Tool registry and dispatch.
//!
//! A tool is a named operation with a declared input schema and an async
//! handler. Tools are registered once at startup into a [`ToolRegistry`],
//! which is then shared read-only by the [`Dispatcher`].
//!
//! # Call flow
//!
//! 1. Resolve the tool by name (`ToolError::NotFound`).
//! 2. Validate the arguments against its [`InputSchema`] (`ToolError::Validation`).
//! 3. Run the handler under the configured timeout (`ToolError::Handler`,
//!    `ToolError::Timeout`).

pub mod dispatch;
pub mod registry;
pub mod schema;
pub mod typed;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use dispatch::Dispatcher;
pub use registry::{RegistryError, ToolDescriptor, ToolRegistry};
pub use schema::{FieldSpec, FieldType, InputSchema, ValidationError};
pub use typed::{Handler, ToolInput, TypedTool};

/// A JSON object returned by a tool.
pub type ToolOutput = Map<String, Value>;

/// Errors surfaced by a tool call.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool '{0}' not found.")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Handler(String),

    #[error("Tool '{tool}' timed out after {}s", .after.as_secs_f32())]
    Timeout { tool: String, after: Duration },
}

#[async_trait]
pub trait Tool: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn schema(&self) -> &InputSchema;

    /// Run the tool on arguments already checked against [`Tool::schema`].
    async fn call(&self, args: Map<String, Value>) -> Result<ToolOutput, ToolError>;
}
