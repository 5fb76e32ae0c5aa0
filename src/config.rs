use clap::Parser;
use clap::error::ErrorKind;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Prefix for hierarchical environment overrides, e.g. `INTEL_SERVER__PORT`.
const ENV_PREFIX: &str = "INTEL";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;
const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path (YAML, TOML or JSON)
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Log verbosity (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub json_logs: Option<bool>,

    /// Cloud project identifier
    #[arg(long, env = "PROJECT_ID")]
    pub project_id: Option<String>,

    /// Shared secret for tool callers
    #[arg(long, env = "MCP_SECRET", hide_env_values = true)]
    pub mcp_secret: Option<String>,

    /// Per-call tool timeout in seconds
    #[arg(long, env = "TOOL_TIMEOUT_SECS")]
    pub tool_timeout_secs: Option<u64>,

    /// Disable the per-call tool timeout
    #[arg(long, env = "TIMEOUT_DISABLED")]
    pub timeout_disabled: Option<bool>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub resilience: ResilienceConfig,
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResilienceConfig {
    pub tool_timeout_secs: u64,
    pub timeout_disabled: bool,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            tool_timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
            timeout_disabled: false,
        }
    }
}

impl ResilienceConfig {
    /// Effective per-call timeout, `None` when disabled.
    pub fn tool_timeout(&self) -> Option<Duration> {
        (!self.timeout_disabled).then_some(Duration::from_secs(self.tool_timeout_secs))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServiceConfig {
    #[serde(default)]
    pub project_id: Option<String>,
}

#[derive(Deserialize, Clone, Default)]
pub struct SecurityConfig {
    #[serde(default)]
    pub mcp_secret: Option<String>,
}

impl SecurityConfig {
    pub fn has_secret(&self) -> bool {
        self.mcp_secret.as_deref().is_some_and(|s| !s.is_empty())
    }
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("mcp_secret", &self.mcp_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = match Cli::try_parse_from(args) {
            Ok(cli) => cli,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => return Err(config::ConfigError::Message(e.to_string())),
        };

        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("server.body_limit_bytes", defaults.server.body_limit_bytes as u64)?
            .set_default(
                "resilience.tool_timeout_secs",
                defaults.resilience.tool_timeout_secs,
            )?
            .set_default("resilience.timeout_disabled", defaults.resilience.timeout_disabled)?
            .set_default("telemetry.log_level", defaults.telemetry.log_level)?
            .set_default("telemetry.json", defaults.telemetry.json)?;

        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path));
        }

        // Hierarchical env, e.g. INTEL_SERVER__PORT=9000
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // CLI flags (and their plain env names, via clap) win over everything.
        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(level) = cli.log_level {
            builder = builder.set_override("telemetry.log_level", level)?;
        }
        if let Some(json) = cli.json_logs {
            builder = builder.set_override("telemetry.json", json)?;
        }
        if let Some(project_id) = cli.project_id {
            builder = builder.set_override("service.project_id", project_id)?;
        }
        if let Some(secret) = cli.mcp_secret {
            builder = builder.set_override("security.mcp_secret", secret)?;
        }
        if let Some(secs) = cli.tool_timeout_secs {
            builder = builder.set_override("resilience.tool_timeout_secs", secs)?;
        }
        if let Some(disabled) = cli.timeout_disabled {
            builder = builder.set_override("resilience.timeout_disabled", disabled)?;
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;
        cfg.normalize()?;
        Ok(cfg)
    }

    fn normalize(&mut self) -> Result<(), config::ConfigError> {
        let level = self.telemetry.log_level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(config::ConfigError::Message(format!(
                "invalid log level '{}', expected one of {}",
                self.telemetry.log_level,
                LOG_LEVELS.join(", ")
            )));
        }
        self.telemetry.log_level = level;

        if self.server.port == 0 {
            return Err(config::ConfigError::Message(
                "server.port must be non-zero".to_string(),
            ));
        }
        if self.resilience.tool_timeout_secs == 0 && !self.resilience.timeout_disabled {
            return Err(config::ConfigError::Message(
                "resilience.tool_timeout_secs must be non-zero unless the timeout is disabled"
                    .to_string(),
            ));
        }

        self.service.project_id = self.service.project_id.take().filter(|s| !s.trim().is_empty());
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
