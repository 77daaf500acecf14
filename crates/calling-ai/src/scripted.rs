//! A backend that replays canned chat-completion responses.
//!
//! Used by the CLI to drive a session offline and by tests to script the
//! model's side of a conversation. Every request body it receives is kept
//! so callers can check exactly what would have gone over the wire.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::{AiError, ChatBackend, ChatResponse, ModelRequest};

#[derive(Debug, Default)]
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Value>>,
    requests: Mutex<Vec<Value>>,
}

impl ScriptedBackend {
    pub fn new(responses: impl IntoIterator<Item = Value>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Load a JSON array of chat-completion payloads.
    pub fn from_file(path: &Path) -> Result<Self, AiError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AiError::ApiError(format!("failed to read {}: {e}", path.display())))?;
        let responses: Vec<Value> = serde_json::from_str(&content).map_err(|e| {
            AiError::ParseError(format!("{} is not a JSON array: {e}", path.display()))
        })?;
        Ok(Self::new(responses))
    }

    /// A completion whose reply is a plain assistant message.
    pub fn message(content: &str) -> Value {
        json!({
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    }

    /// A completion whose reply requests a function call.
    pub fn function_call(name: &str, arguments: &str) -> Value {
        json!({
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "function_call": {"name": name, "arguments": arguments}
                },
                "finish_reason": "function_call"
            }]
        })
    }

    pub fn push(&self, response: Value) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }

    /// Bodies of every request received so far.
    pub fn requests(&self) -> Vec<Value> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(&self, request: &ModelRequest<'_>) -> Result<ChatResponse, AiError> {
        let body = request.to_body();
        debug!(model = %request.model, turns = request.messages.len(), "scripted request");
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(body);

        let next = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or(AiError::Exhausted)?;
        ChatResponse::from_completion(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ReplyMessage, RequestConfig, Turn};

    fn request_config() -> RequestConfig {
        RequestConfig {
            model: "gpt-test".into(),
            extra: serde_json::Map::new(),
            dispatch_enabled: false,
        }
    }

    #[tokio::test]
    async fn replays_in_order_and_records_requests() {
        let backend = ScriptedBackend::new([
            ScriptedBackend::function_call("f", "{}"),
            ScriptedBackend::message("done"),
        ]);
        let config = request_config();
        let turns = [Turn::system("s"), Turn::user("go")];

        let first = backend.complete(&config.request(&turns, &[])).await.unwrap();
        assert!(matches!(first.reply, ReplyMessage::FunctionCall(_)));
        let second = backend.complete(&config.request(&turns, &[])).await.unwrap();
        assert_eq!(second.reply, ReplyMessage::Message("done".into()));

        assert_eq!(backend.remaining(), 0);
        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0]["messages"][1]["content"], "go");
    }

    #[tokio::test]
    async fn exhausted_script_is_an_error() {
        let backend = ScriptedBackend::default();
        let config = request_config();
        let err = backend
            .complete(&config.request(&[], &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Exhausted));
        // The request is still recorded.
        assert_eq!(backend.requests().len(), 1);
    }

    #[test]
    fn loads_script_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.json");
        let script = Value::Array(vec![ScriptedBackend::message("a"), ScriptedBackend::message("b")]);
        std::fs::write(&path, script.to_string()).unwrap();

        let backend = ScriptedBackend::from_file(&path).unwrap();
        assert_eq!(backend.remaining(), 2);
    }

    #[test]
    fn non_array_script_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.json");
        std::fs::write(&path, "{\"choices\": []}").unwrap();

        let err = ScriptedBackend::from_file(&path).unwrap_err();
        assert!(matches!(err, AiError::ParseError(_)));
    }
}
