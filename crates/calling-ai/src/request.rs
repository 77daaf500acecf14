//! Outbound model requests.

use serde_json::{json, Map, Value};

use calling_config::RESERVED_REQUEST_KEYS;

use crate::{FunctionSpec, Turn};

/// Value of `function_call` when the catalog is non-empty.
pub const FUNCTION_CALL_AUTO: &str = "auto";

/// Fixed per-session request parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    pub model: String,
    /// Extra parameters merged into every request body.
    pub extra: Map<String, Value>,
    /// Whether the model may request function calls.
    pub dispatch_enabled: bool,
}

impl RequestConfig {
    /// Build the request for the transcript as it stands right now.
    pub fn request<'a>(
        &'a self,
        messages: &'a [Turn],
        catalog: &'a [FunctionSpec],
    ) -> ModelRequest<'a> {
        let dispatch = self.dispatch_enabled && !catalog.is_empty();
        ModelRequest {
            model: &self.model,
            messages,
            functions: dispatch.then_some(catalog),
            function_call: dispatch.then_some(FUNCTION_CALL_AUTO),
            extra: &self.extra,
        }
    }
}

/// One model request. Borrows the session's live transcript, so every
/// request carries the complete history at the moment it is sent.
#[derive(Debug, Clone, Copy)]
pub struct ModelRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Turn],
    pub functions: Option<&'a [FunctionSpec]>,
    pub function_call: Option<&'static str>,
    pub extra: &'a Map<String, Value>,
}

impl ModelRequest<'_> {
    /// Render the chat-completion request body.
    ///
    /// Extra parameters sit at the top level; they never replace the
    /// session-managed keys.
    pub fn to_body(&self) -> Value {
        let mut body: Map<String, Value> = self
            .extra
            .iter()
            .filter(|(key, _)| !RESERVED_REQUEST_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        body.insert("model".into(), json!(self.model));
        body.insert("messages".into(), json!(self.messages));

        if let Some(functions) = self.functions {
            body.insert("functions".into(), json!(functions));
        }
        if let Some(mode) = self.function_call {
            body.insert("function_call".into(), json!(mode));
        }

        Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str) -> FunctionSpec {
        FunctionSpec {
            name: name.into(),
            description: String::new(),
            parameters: json!({"type": "object", "properties": {}}),
        }
    }

    fn config() -> RequestConfig {
        RequestConfig {
            model: "gpt-test".into(),
            extra: Map::new(),
            dispatch_enabled: true,
        }
    }

    #[test]
    fn empty_catalog_omits_functions() {
        let config = config();
        let turns = [Turn::system("s"), Turn::user("hello")];
        let request = config.request(&turns, &[]);
        assert!(request.functions.is_none());
        assert!(request.function_call.is_none());

        let body = request.to_body();
        assert_eq!(body["model"], "gpt-test");
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(2));
        assert!(body.get("functions").is_none());
        assert!(body.get("function_call").is_none());
    }

    #[test]
    fn catalog_enables_auto_function_call() {
        let config = config();
        let catalog = [spec("get_weather")];
        let body = config.request(&[], &catalog).to_body();
        assert_eq!(body["function_call"], "auto");
        assert_eq!(body["functions"][0]["name"], "get_weather");
    }

    #[test]
    fn disabled_dispatch_hides_catalog() {
        let mut config = config();
        config.dispatch_enabled = false;
        let catalog = [spec("get_weather")];
        let body = config.request(&[], &catalog).to_body();
        assert!(body.get("functions").is_none());
    }

    #[test]
    fn extras_merge_without_overriding_managed_keys() {
        let mut config = config();
        config.extra.insert("temperature".into(), json!(0.1));
        config.extra.insert("model".into(), json!("hijacked"));
        let body = config.request(&[], &[]).to_body();
        assert_eq!(body["temperature"], json!(0.1));
        assert_eq!(body["model"], "gpt-test");
    }
}
