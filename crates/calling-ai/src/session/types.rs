//! Values returned from `ask`.

use serde_json::Value;

/// The outcome of one `ask`.
///
/// Chained asks always end in `Message`. A non-chained ask yields
/// `FunctionCall` when the model's single reply requested a function.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Message(String),
    FunctionCall {
        /// Canonical dotted name of the function that ran.
        function: String,
        /// What it returned, unconverted.
        value: Value,
    },
}

impl Reply {
    pub fn is_message(&self) -> bool {
        matches!(self, Reply::Message(_))
    }

    pub fn as_message(&self) -> Option<&str> {
        match self {
            Reply::Message(content) => Some(content),
            Reply::FunctionCall { .. } => None,
        }
    }

    /// Text form: the message, or the function's return value as it was
    /// written into the transcript.
    pub fn into_text(self) -> String {
        match self {
            Reply::Message(content) => content,
            Reply::FunctionCall { value, .. } => value_to_text(&value),
        }
    }
}

/// Render a function result as `function` turn content. Strings are used
/// verbatim; everything else is compact JSON.
pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
