//! The ask loop: request, dispatch, feed back, repeat.

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{DispatchError, SessionError};
use crate::namespace::canonical_name;
use crate::response::{FunctionInvocation, ReplyMessage};
use crate::{ChatBackend, ChatResponse, Turn};

use super::manager::Session;
use super::types::{value_to_text, Reply};

impl Session {
    /// Add a user message and resolve the model's reply.
    ///
    /// Chained: every function call the model requests is dispatched and
    /// its result (or dispatch error) appended as a `function` turn before
    /// asking again, until the model answers with a plain message.
    ///
    /// Non-chained: one request. A requested function runs once and its
    /// raw result is returned without a follow-up request. Dispatch errors
    /// propagate and leave no `function` turn behind.
    pub async fn ask(
        &mut self,
        backend: &dyn ChatBackend,
        message: impl Into<String>,
        chained: bool,
    ) -> Result<Reply, SessionError> {
        self.transcript.push(Turn::user(message));
        debug!(session = %self.id.short(), chained, "user turn appended");

        let reply = self.send(backend).await?;
        if chained {
            self.run_chain(backend, reply).await
        } else {
            self.resolve_once(reply)
        }
    }

    /// Chained `ask` returning the final message text.
    pub async fn chat(
        &mut self,
        backend: &dyn ChatBackend,
        message: impl Into<String>,
    ) -> Result<String, SessionError> {
        self.ask(backend, message, true).await.map(Reply::into_text)
    }

    async fn run_chain(
        &mut self,
        backend: &dyn ChatBackend,
        mut reply: ReplyMessage,
    ) -> Result<Reply, SessionError> {
        let mut rounds: u32 = 0;

        loop {
            let invocation = match reply {
                ReplyMessage::Message(content) => {
                    self.transcript.push(Turn::assistant(content.clone()));
                    debug!(session = %self.id.short(), rounds, "chain finished");
                    return Ok(Reply::Message(content));
                }
                ReplyMessage::FunctionCall(invocation) => invocation,
            };

            rounds += 1;
            if let Some(max) = self.max_function_rounds {
                if rounds > max {
                    warn!(session = %self.id.short(), max, "function round limit reached");
                    return Err(SessionError::RoundLimit(max));
                }
            }

            // Dispatch failures go back to the model, never to the caller.
            let content = match self.dispatch(&invocation) {
                Ok(value) => value_to_text(&value),
                Err(err) => {
                    warn!(
                        session = %self.id.short(),
                        function = %invocation.name,
                        kind = %err.kind(),
                        "function call failed, reporting to model"
                    );
                    err.to_string()
                }
            };

            self.transcript
                .push(Turn::function(invocation.name, content));
            reply = self.send(backend).await?;
        }
    }

    fn resolve_once(&mut self, reply: ReplyMessage) -> Result<Reply, SessionError> {
        match reply {
            ReplyMessage::Message(content) => {
                self.transcript.push(Turn::assistant(content.clone()));
                Ok(Reply::Message(content))
            }
            ReplyMessage::FunctionCall(invocation) => {
                let value = self.dispatch(&invocation)?;
                self.transcript
                    .push(Turn::function(invocation.name.clone(), value_to_text(&value)));
                Ok(Reply::FunctionCall {
                    function: canonical_name(&invocation.name),
                    value,
                })
            }
        }
    }

    fn dispatch(&self, invocation: &FunctionInvocation) -> Result<Value, DispatchError> {
        debug!(
            session = %self.id.short(),
            function = %invocation.name,
            arguments = %invocation.arguments,
            "function call requested"
        );
        let args = invocation.parse_arguments()?;
        self.namespace.call_function(&invocation.name, args)
    }

    /// Send the current transcript and log the raw response.
    async fn send(&mut self, backend: &dyn ChatBackend) -> Result<ReplyMessage, SessionError> {
        let request = self.next_request();
        debug!(
            session = %self.id.short(),
            turns = request.messages.len(),
            "model request"
        );
        let ChatResponse { raw, reply } = backend.complete(&request).await?;

        self.response_log.record(raw);
        Ok(reply)
    }
}
