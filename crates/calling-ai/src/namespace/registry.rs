//! The namespace: name → callable lookup and dispatch.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::errors::{DispatchError, NamespaceError};
use crate::FunctionSpec;

use super::module::{ArgumentError, Arguments, Callable, Module};
use super::schema::ArgumentSchema;

/// Normalize a model-emitted name (`weather-get`) to canonical form
/// (`weather.get`).
pub fn canonical_name(name: &str) -> String {
    name.replace('-', ".")
}

/// The wire form of a canonical name.
pub fn advertised_name(canonical: &str) -> String {
    canonical.replace('.', "-")
}

/// A registered function.
pub struct CallableEntry {
    name: String,
    spec: FunctionSpec,
    arguments: ArgumentSchema,
    callable: Box<dyn Callable>,
}

impl CallableEntry {
    /// Canonical dotted name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entry as advertised to the model.
    pub fn spec(&self) -> &FunctionSpec {
        &self.spec
    }
}

impl fmt::Debug for CallableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallableEntry")
            .field("name", &self.name)
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// Immutable set of callable entries built once from a module list.
#[derive(Debug, Default)]
pub struct Namespace {
    entries: Vec<CallableEntry>,
    /// Catalog in registration order, parallel to `entries`.
    catalog: Vec<FunctionSpec>,
    index: HashMap<String, usize>,
}

impl Namespace {
    /// Build the namespace. Duplicate or malformed names fail here rather
    /// than at dispatch time.
    pub fn new(modules: impl IntoIterator<Item = Module>) -> Result<Self, NamespaceError> {
        let mut namespace = Self::default();

        for module in modules {
            validate_segments(&module.name, true)?;
            for def in module.functions {
                validate_segments(&def.name, false)?;
                let name = if module.name.is_empty() {
                    def.name
                } else {
                    format!("{}.{}", module.name, def.name)
                };

                if namespace.index.contains_key(&name) {
                    return Err(NamespaceError::DuplicateFunction(name));
                }

                let arguments = ArgumentSchema::compile(&def.parameters).map_err(|detail| {
                    NamespaceError::InvalidSchema {
                        function: name.clone(),
                        detail,
                    }
                })?;
                let spec = FunctionSpec {
                    name: advertised_name(&name),
                    description: def.description,
                    parameters: def.parameters,
                };
                namespace.index.insert(name.clone(), namespace.entries.len());
                namespace.catalog.push(spec.clone());
                namespace.entries.push(CallableEntry {
                    name,
                    spec,
                    arguments,
                    callable: def.callable,
                });
            }
        }

        debug!(functions = namespace.entries.len(), "namespace built");
        Ok(namespace)
    }

    /// The advertised function list, in registration order.
    pub fn catalog(&self) -> &[FunctionSpec] {
        &self.catalog
    }

    pub fn entries(&self) -> impl Iterator<Item = &CallableEntry> {
        self.entries.iter()
    }

    /// Find an entry by canonical or advertised name.
    pub fn resolve(&self, name: &str) -> Option<&CallableEntry> {
        self.index
            .get(&canonical_name(name))
            .map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up `name`, check `args` against the entry's schema and run it.
    ///
    /// No retries; whatever the function does is its own business.
    pub fn call_function(&self, name: &str, args: Arguments) -> Result<Value, DispatchError> {
        let entry = self
            .resolve(name)
            .ok_or_else(|| DispatchError::UnknownFunction(name.to_string()))?;

        if let Err(problems) = entry.arguments.check(&args) {
            return Err(DispatchError::InvalidArguments {
                function: entry.name.clone(),
                parameters: problems.parameters,
                detail: problems.detail,
            });
        }

        debug!(function = %entry.name, "calling function");
        match entry.callable.call(args) {
            Ok(value) => {
                debug!(function = %entry.name, "function returned");
                Ok(value)
            }
            Err(err) => match err.downcast::<ArgumentError>() {
                Ok(rejected) => {
                    let ArgumentError { parameters, detail } = *rejected;
                    Err(DispatchError::InvalidArguments {
                        function: entry.name.clone(),
                        parameters,
                        detail,
                    })
                }
                Err(source) => {
                    debug!(function = %entry.name, error = %source, "function failed");
                    Err(DispatchError::ExecutionFailed {
                        function: entry.name.clone(),
                        source,
                    })
                }
            },
        }
    }
}

/// Dotted segments must be non-empty `[A-Za-z0-9_]+`. Module names may be
/// empty (top level) and may themselves be dotted.
fn validate_segments(name: &str, allow_empty: bool) -> Result<(), NamespaceError> {
    if name.is_empty() {
        return if allow_empty {
            Ok(())
        } else {
            Err(NamespaceError::InvalidName(name.to_string()))
        };
    }

    let valid = name.split('.').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
    });

    if valid {
        Ok(())
    } else {
        Err(NamespaceError::InvalidName(name.to_string()))
    }
}
