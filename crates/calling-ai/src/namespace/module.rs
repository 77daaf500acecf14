//! Function definitions and the modules that group them.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Named arguments, decoded from the model's JSON payload.
pub type Arguments = Map<String, Value>;

/// Failure raised by a function body.
pub type CallError = Box<dyn std::error::Error + Send + Sync>;

/// Something the namespace can invoke with named arguments.
pub trait Callable: Send + Sync {
    fn call(&self, args: Arguments) -> Result<Value, CallError>;
}

impl<F> Callable for F
where
    F: Fn(Arguments) -> Result<Value, CallError> + Send + Sync,
{
    fn call(&self, args: Arguments) -> Result<Value, CallError> {
        self(args)
    }
}

/// Returned by a callable to reject its arguments. The namespace reports
/// it as `InvalidArguments` rather than `ExecutionFailed`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{detail}")]
pub struct ArgumentError {
    pub parameters: Vec<String>,
    pub detail: String,
}

impl ArgumentError {
    pub fn new(parameters: Vec<String>, detail: impl Into<String>) -> Self {
        Self {
            parameters,
            detail: detail.into(),
        }
    }

    /// Build from a serde decoding error, recovering the field name from
    /// "missing field `x`" / "unknown field `x`" messages.
    fn from_serde(err: &serde_json::Error) -> Self {
        let detail = err.to_string();
        let parameters = ["missing field `", "unknown field `"]
            .iter()
            .find_map(|prefix| detail.strip_prefix(prefix))
            .and_then(|rest| rest.split('`').next())
            .map(|field| vec![field.to_string()])
            .unwrap_or_default();
        Self { parameters, detail }
    }
}

/// One function: its name within the module, what it does, a JSON Schema
/// for its parameters, and the body.
pub struct FunctionDef {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) parameters: Value,
    pub(crate) callable: Box<dyn Callable>,
}

impl FunctionDef {
    pub fn new<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
        body: F,
    ) -> Self
    where
        F: Fn(Arguments) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        Self::from_callable(name, description, parameters, body)
    }

    pub fn from_callable(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
        callable: impl Callable + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            callable: Box::new(callable),
        }
    }

    /// Define a function over typed arguments. The argument map is decoded
    /// into `A` and the return value encoded back to JSON.
    pub fn typed<A, R, E, F>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
        body: F,
    ) -> Self
    where
        A: DeserializeOwned,
        R: Serialize,
        E: Into<CallError>,
        F: Fn(A) -> Result<R, E> + Send + Sync + 'static,
    {
        Self::new(name, description, parameters, move |args: Arguments| {
            let args: A = serde_json::from_value(Value::Object(args))
                .map_err(|e| Box::new(ArgumentError::from_serde(&e)) as CallError)?;
            let ret = body(args).map_err(Into::<CallError>::into)?;
            Ok(serde_json::to_value(ret)?)
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// A named group of functions. An empty module name registers its
/// functions at the top level.
#[derive(Debug, Default)]
pub struct Module {
    pub(crate) name: String,
    pub(crate) functions: Vec<FunctionDef>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: Vec::new(),
        }
    }

    pub fn top_level() -> Self {
        Self::default()
    }

    pub fn function(mut self, def: FunctionDef) -> Self {
        self.functions.push(def);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
