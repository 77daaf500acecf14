//! Model responses and the function invocations they may carry.

use serde_json::Value;

use crate::errors::DispatchError;
use crate::namespace::Arguments;
use crate::AiError;

/// A model response: the raw payload (kept for the response log) plus
/// the single reply it carries.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub raw: Value,
    pub reply: ReplyMessage,
}

/// What the model answered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyMessage {
    Message(String),
    FunctionCall(FunctionInvocation),
}

/// A model-emitted request to run a named function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInvocation {
    /// Name exactly as the model emitted it.
    pub name: String,
    /// Serialized JSON argument object.
    pub arguments: String,
}

impl FunctionInvocation {
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Parse the argument payload into a named-argument map.
    ///
    /// A blank payload is an empty map. Anything that is not a JSON
    /// object fails with `MalformedArguments`.
    pub fn parse_arguments(&self) -> Result<Arguments, DispatchError> {
        let payload = self.arguments.trim();
        if payload.is_empty() {
            return Ok(Arguments::new());
        }

        match serde_json::from_str::<Value>(payload) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(DispatchError::MalformedArguments {
                function: self.name.clone(),
                detail: format!("expected a JSON object, got {}", json_type(&other)),
            }),
            Err(e) => Err(DispatchError::MalformedArguments {
                function: self.name.clone(),
                detail: e.to_string(),
            }),
        }
    }
}

impl ChatResponse {
    /// Parse a chat-completion payload (`choices[0].message`).
    pub fn from_completion(raw: Value) -> Result<Self, AiError> {
        let message = raw["choices"]
            .as_array()
            .and_then(|choices| choices.first())
            .map(|choice| &choice["message"])
            .filter(|message| message.is_object())
            .ok_or_else(|| AiError::ParseError("no message in response choices".to_string()))?;

        let reply = match message.get("function_call").filter(|fc| !fc.is_null()) {
            Some(fc) => {
                let name = fc["name"]
                    .as_str()
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| AiError::ParseError("function_call has no name".to_string()))?;
                let arguments = match &fc["arguments"] {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    // Some backends send the object already decoded.
                    other => other.to_string(),
                };
                ReplyMessage::FunctionCall(FunctionInvocation::new(name, arguments))
            }
            None => ReplyMessage::Message(
                message["content"].as_str().unwrap_or_default().to_string(),
            ),
        };

        Ok(Self { raw, reply })
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
