//! Argument checks against a function's JSON Schema.
//!
//! Each entry's `parameters` is compiled once when the namespace is
//! built. An object schema that leaves `additionalProperties` unset is
//! compiled as closed, so parameters the function never declared are
//! rejected.

use jsonschema::error::ValidationErrorKind;
use jsonschema::{JSONSchema, ValidationError};
use serde_json::Value;

use super::module::Arguments;

pub(crate) struct Problems {
    pub(crate) parameters: Vec<String>,
    pub(crate) detail: String,
}

/// A compiled parameter schema.
pub(crate) struct ArgumentSchema {
    compiled: JSONSchema,
}

impl ArgumentSchema {
    pub(crate) fn compile(parameters: &Value) -> Result<Self, String> {
        let schema = close_object(parameters);
        let compiled = JSONSchema::compile(&schema).map_err(|e| e.to_string())?;
        Ok(Self { compiled })
    }

    /// Validate `args`, collecting every violation.
    pub(crate) fn check(&self, args: &Arguments) -> Result<(), Problems> {
        let instance = Value::Object(args.clone());
        let Err(errors) = self.compiled.validate(&instance) else {
            return Ok(());
        };

        let mut parameters = Vec::new();
        let mut messages = Vec::new();
        for error in errors {
            let offending = offending_parameters(&error);
            messages.push(match offending.as_slice() {
                [name] => format!("parameter `{name}`: {error}"),
                _ => error.to_string(),
            });
            parameters.extend(offending);
        }
        parameters.sort();
        parameters.dedup();

        Err(Problems {
            parameters,
            detail: messages.join("; "),
        })
    }
}

/// Top-level parameters a validation error is about. Errors on nested
/// values are attributed to the parameter that contains them.
fn offending_parameters(error: &ValidationError<'_>) -> Vec<String> {
    match &error.kind {
        ValidationErrorKind::Required { property } => match property {
            Value::String(name) => vec![name.clone()],
            other => vec![other.to_string()],
        },
        ValidationErrorKind::AdditionalProperties { unexpected } => unexpected.clone(),
        _ => error
            .instance_path
            .clone()
            .into_vec()
            .into_iter()
            .take(1)
            .collect(),
    }
}

fn close_object(parameters: &Value) -> Value {
    let mut schema = parameters.clone();
    if let Value::Object(ref mut map) = schema {
        let is_object = map.get("type").and_then(Value::as_str) == Some("object")
            || map.contains_key("properties");
        if is_object && !map.contains_key("additionalProperties") {
            map.insert("additionalProperties".into(), Value::Bool(false));
        }
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Arguments {
        match value {
            Value::Object(map) => map,
            _ => panic!("test arguments must be an object"),
        }
    }

    fn weather_schema() -> ArgumentSchema {
        ArgumentSchema::compile(&json!({
            "type": "object",
            "properties": {
                "city": {"type": "string"},
                "days": {"type": "integer"},
                "unit": {"type": "string", "enum": ["c", "f"]},
                "note": {"type": ["string", "null"]}
            },
            "required": ["city"]
        }))
        .unwrap()
    }

    #[test]
    fn valid_arguments_pass() {
        let result = weather_schema().check(&args(
            json!({"city": "Paris", "days": 3, "unit": "c", "note": null}),
        ));
        assert!(result.is_ok());
    }

    #[test]
    fn whole_number_float_is_an_integer() {
        let result = weather_schema().check(&args(json!({"city": "Paris", "days": 2.0})));
        assert!(result.is_ok());
    }

    #[test]
    fn missing_required_is_reported() {
        let problems = weather_schema().check(&args(json!({}))).unwrap_err();
        assert_eq!(problems.parameters, vec!["city"]);
        assert!(problems.detail.starts_with("parameter `city`: "));
    }

    #[test]
    fn unexpected_parameter_is_reported() {
        let problems = weather_schema()
            .check(&args(json!({"city": "Paris", "zip": "75001"})))
            .unwrap_err();
        assert_eq!(problems.parameters, vec!["zip"]);
    }

    #[test]
    fn additional_properties_true_allows_extras() {
        let schema = ArgumentSchema::compile(
            &json!({"type": "object", "properties": {}, "additionalProperties": true}),
        )
        .unwrap();
        assert!(schema.check(&args(json!({"anything": 1}))).is_ok());
    }

    #[test]
    fn wrong_type_is_reported() {
        let problems = weather_schema()
            .check(&args(json!({"city": "Paris", "days": 2.5})))
            .unwrap_err();
        assert_eq!(problems.parameters, vec!["days"]);
        assert!(problems.detail.starts_with("parameter `days`: "));
    }

    #[test]
    fn enum_violation_is_reported() {
        let problems = weather_schema()
            .check(&args(json!({"city": "Paris", "unit": "k"})))
            .unwrap_err();
        assert_eq!(problems.parameters, vec!["unit"]);
    }

    #[test]
    fn every_problem_is_collected() {
        let problems = weather_schema()
            .check(&args(json!({"days": "three", "zip": 1})))
            .unwrap_err();
        assert_eq!(problems.parameters, vec!["city", "days", "zip"]);
    }

    #[test]
    fn malformed_schema_does_not_compile() {
        assert!(ArgumentSchema::compile(&json!({"type": 12})).is_err());
    }
}
