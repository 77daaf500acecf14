//! Session struct, construction and read access.

use calling_common::SessionId;
use calling_config::{SessionConfig, DEFAULT_SYSTEM_PROMPT};
use serde_json::Map;
use tracing::debug;

use crate::errors::NamespaceError;
use crate::namespace::{Module, Namespace};
use crate::request::{ModelRequest, RequestConfig};
use crate::transcript::{ResponseLog, Transcript};

/// A conversation with function dispatch.
pub struct Session {
    pub(super) id: SessionId,
    /// Registered functions; fixed for the life of the session.
    pub(super) namespace: Namespace,
    /// Turn history, opened by the system turn.
    pub(super) transcript: Transcript,
    /// Every raw response received.
    pub(super) response_log: ResponseLog,
    pub(super) config: RequestConfig,
    /// Cap on function dispatches per chained `ask`; `None` is uncapped.
    pub(super) max_function_rounds: Option<u32>,
}

impl Session {
    /// Session with the default system prompt and no extra parameters.
    pub fn new(
        modules: impl IntoIterator<Item = Module>,
        model: impl Into<String>,
    ) -> Result<Self, NamespaceError> {
        Self::build(
            modules,
            model.into(),
            DEFAULT_SYSTEM_PROMPT.to_string(),
            Map::new(),
            None,
        )
    }

    pub fn from_config(
        modules: impl IntoIterator<Item = Module>,
        config: &SessionConfig,
    ) -> Result<Self, NamespaceError> {
        Self::build(
            modules,
            config.model.clone(),
            config.system_prompt.clone(),
            config.extra.clone(),
            config.max_function_rounds,
        )
    }

    fn build(
        modules: impl IntoIterator<Item = Module>,
        model: String,
        system_prompt: String,
        extra: Map<String, serde_json::Value>,
        max_function_rounds: Option<u32>,
    ) -> Result<Self, NamespaceError> {
        let namespace = Namespace::new(modules)?;
        let config = RequestConfig {
            model,
            extra,
            dispatch_enabled: !namespace.is_empty(),
        };
        let id = SessionId::new();

        debug!(
            session = %id.short(),
            model = %config.model,
            functions = namespace.len(),
            "session created"
        );

        Ok(Self {
            id,
            namespace,
            transcript: Transcript::new(system_prompt),
            response_log: ResponseLog::default(),
            config,
            max_function_rounds,
        })
    }

    /// Replace the opening system turn.
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.transcript.set_system(system_prompt);
        self
    }

    /// Extra parameters merged into every request body. Reserved keys
    /// are ignored when the body is rendered.
    pub fn with_extra(mut self, extra: Map<String, serde_json::Value>) -> Self {
        self.config.extra = extra;
        self
    }

    pub fn with_max_function_rounds(mut self, max_function_rounds: Option<u32>) -> Self {
        self.max_function_rounds = max_function_rounds;
        self
    }

    /// The request the next model call would carry.
    pub fn next_request(&self) -> ModelRequest<'_> {
        self.config
            .request(self.transcript.turns(), self.namespace.catalog())
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn response_log(&self) -> &ResponseLog {
        &self.response_log
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn request_config(&self) -> &RequestConfig {
        &self.config
    }

    pub fn max_function_rounds(&self) -> Option<u32> {
        self.max_function_rounds
    }
}
