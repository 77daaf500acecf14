//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-16k";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant. \
When a registered function can answer part of the request, call it instead of guessing, \
then use its result to write the final answer.";

/// Request keys owned by the session; `session.extra` may not set them.
pub const RESERVED_REQUEST_KEYS: &[&str] = &["model", "messages", "functions", "function_call"];

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CallingConfig {
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Per-session model call parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Model identifier sent with every request.
    pub model: String,
    /// Content of the system turn that opens every transcript.
    pub system_prompt: String,
    /// Cap on function dispatches per `ask` in chained mode. Unset means
    /// the loop runs until the model answers with a plain message.
    pub max_function_rounds: Option<u32>,
    /// Extra request parameters (temperature, top_p, ...) merged into
    /// every request body.
    pub extra: Map<String, Value>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_function_rounds: None,
            extra: Map::new(),
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
