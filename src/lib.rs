//! Company Intelligence Tool Service
//!
//! An HTTP microservice exposing a registry of company research tools. Each
//! tool declares an input schema; calls are validated against it and then
//! dispatched to a provider that produces a JSON result.
//!
//! # Architecture
//!
//! - **Server**: Axum HTTP server with request tracing and body limits
//! - **Tools**: Registry, schema validation and guarded dispatch
//! - **Intel**: The four company intelligence tools and their mock providers
//!
//! # Modules
//!
//! - [`api`]: HTTP routes and error mapping
//! - [`config`]: Layered configuration (defaults, file, env, CLI)
//! - [`intel`]: Tool inputs, providers and the default registry
//! - [`server`]: Router assembly and startup
//! - [`telemetry`]: Structured logging setup
//! - [`tools`]: Tool trait, registry and dispatcher

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod api;
pub mod config;
pub mod intel;
pub mod server;
pub mod telemetry;
pub mod tools;

use std::sync::Arc;

use crate::config::AppConfig;
use tools::{Dispatcher, ToolRegistry};

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Tool dispatcher over the read-only registry.
    pub dispatcher: Arc<Dispatcher>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// State backed by the default (mock) intelligence tools.
    pub fn new(config: Arc<AppConfig>) -> Result<Self, tools::RegistryError> {
        Ok(Self::with_registry(config, intel::default_registry()?))
    }

    pub fn with_registry(config: Arc<AppConfig>, registry: ToolRegistry) -> Self {
        let dispatcher = Dispatcher::new(Arc::new(registry), config.resilience.tool_timeout());
        Self {
            dispatcher: Arc::new(dispatcher),
            config,
        }
    }
}
