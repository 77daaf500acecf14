//! Registry and dispatcher for functions the model may call.
//!
//! Functions are grouped into [`Module`]s. A function `get` in module
//! `weather` has the canonical name `weather.get` and is advertised to
//! the model as `weather-get`, since function names on the wire cannot
//! contain dots. Lookups accept either spelling.

mod module;
mod registry;
mod schema;


pub use module::{ArgumentError, Arguments, CallError, Callable, FunctionDef, Module};
pub use registry::{advertised_name, canonical_name, CallableEntry, Namespace};
