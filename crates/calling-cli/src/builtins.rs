//! Built-in function modules the CLI registers with every session.

use calling_ai::{ArgumentError, Arguments, CallError, FunctionDef, Module};
use serde::Deserialize;
use serde_json::{json, Value};

/// Every built-in module, in registration order.
pub fn builtin_modules() -> Vec<Module> {
    vec![math_module(), text_module()]
}

#[derive(Debug, Deserialize)]
struct Operands {
    a: f64,
    b: f64,
}

fn operands_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "a": {"type": "number", "description": "Left operand"},
            "b": {"type": "number", "description": "Right operand"}
        },
        "required": ["a", "b"]
    })
}

fn math_module() -> Module {
    Module::new("math")
        .function(FunctionDef::typed(
            "add",
            "Add two numbers.",
            operands_schema(),
            |ops: Operands| Ok::<_, CallError>(ops.a + ops.b),
        ))
        .function(FunctionDef::typed(
            "multiply",
            "Multiply two numbers.",
            operands_schema(),
            |ops: Operands| Ok::<_, CallError>(ops.a * ops.b),
        ))
        .function(FunctionDef::typed(
            "divide",
            "Divide a by b.",
            operands_schema(),
            |ops: Operands| {
                if ops.b == 0.0 {
                    Err("division by zero")
                } else {
                    Ok(ops.a / ops.b)
                }
            },
        ))
}

fn text_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "text": {"type": "string", "description": "Input text"}
        },
        "required": ["text"]
    })
}

fn text_arg(args: &Arguments) -> Result<&str, CallError> {
    args.get("text").and_then(Value::as_str).ok_or_else(|| {
        Box::new(ArgumentError::new(vec!["text".into()], "`text` must be a string")) as CallError
    })
}

fn text_module() -> Module {
    Module::new("text")
        .function(FunctionDef::new(
            "upper",
            "Convert text to upper case.",
            text_schema(),
            |args: Arguments| Ok(json!(text_arg(&args)?.to_uppercase())),
        ))
        .function(FunctionDef::new(
            "word_count",
            "Count the words in a text.",
            text_schema(),
            |args: Arguments| Ok(json!(text_arg(&args)?.split_whitespace().count())),
        ))
}
