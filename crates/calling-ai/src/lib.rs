//! Function-calling conversation engine.
//!
//! Provides:
//! - A [`Namespace`] of externally registered functions the model may call
//! - A [`Session`] that owns the transcript and drives the
//!   request → function call → request loop until the model answers
//! - The [`ChatBackend`] boundary a model client implements, plus a
//!   [`ScriptedBackend`] that replays canned completions

pub mod errors;
pub mod namespace;
pub mod request;
pub mod response;
pub mod scripted;
pub mod session;
pub mod transcript;

use async_trait::async_trait;

pub use errors::{DispatchError, ErrorKind, NamespaceError, Resolution, SessionError};
pub use namespace::{
    ArgumentError, Arguments, CallError, Callable, CallableEntry, FunctionDef, Module, Namespace,
};
pub use request::{ModelRequest, RequestConfig};
pub use response::{ChatResponse, FunctionInvocation, ReplyMessage};
pub use scripted::ScriptedBackend;
pub use session::{Reply, Session};
pub use transcript::{ResponseLog, Transcript};

/// A model backend: takes the full request and returns one reply.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: &ModelRequest<'_>) -> Result<ChatResponse, AiError>;
}

/// One entry in the conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    /// Function the turn reports on; only set for `function` turns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    pub fn function(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Function,
            content: content.into(),
            name: Some(name.into()),
        }
    }

    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Function,
}

/// A function as advertised to the model.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
    #[error("Backend has no more responses")]
    Exhausted,
}
