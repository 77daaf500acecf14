//! Error taxonomy for namespace construction, function dispatch and
//! the session loop.
//!
//! Dispatch failures are [`Resolution::Recoverable`] in chained mode: the
//! session writes them into the transcript as a `function` turn and lets
//! the model react. Everything the core cannot heal is
//! [`Resolution::Fatal`] and reaches the caller as a [`SessionError`].

use std::fmt;

use crate::namespace::CallError;
use crate::AiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownFunction,
    InvalidArguments,
    MalformedArguments,
    ExecutionFailed,
    Backend,
    Configuration,
    RoundLimit,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnknownFunction => "UnknownFunction",
            ErrorKind::InvalidArguments => "InvalidArguments",
            ErrorKind::MalformedArguments => "MalformedArguments",
            ErrorKind::ExecutionFailed => "ExecutionFailed",
            ErrorKind::Backend => "Backend",
            ErrorKind::Configuration => "Configuration",
            ErrorKind::RoundLimit => "RoundLimit",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a failure is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Reported back to the model as a `function` turn.
    Recoverable(ErrorKind, String),
    /// Propagated to the caller.
    Fatal(ErrorKind, String),
}

impl Resolution {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Resolution::Recoverable(kind, _) | Resolution::Fatal(kind, _) => *kind,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, Resolution::Recoverable(..))
    }
}

/// Raised while building a [`Namespace`](crate::Namespace).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamespaceError {
    #[error("duplicate function name: {0}")]
    DuplicateFunction(String),
    #[error("invalid function name {0:?}: segments must be non-empty and use only letters, digits and '_'")]
    InvalidName(String),
    #[error("invalid parameter schema for {function}: {detail}")]
    InvalidSchema { function: String, detail: String },
}

/// Failure to resolve or run one model-requested function call.
///
/// The `Display` form is `"<Kind>: <detail>"`; that exact text becomes
/// the content of the `function` turn in chained mode.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("UnknownFunction: {0}")]
    UnknownFunction(String),

    #[error("InvalidArguments: {function}: {detail}")]
    InvalidArguments {
        function: String,
        parameters: Vec<String>,
        detail: String,
    },

    #[error("MalformedArguments: {function}: {detail}")]
    MalformedArguments { function: String, detail: String },

    #[error("ExecutionFailed: {function}: {source}")]
    ExecutionFailed {
        function: String,
        #[source]
        source: CallError,
    },
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::UnknownFunction(_) => ErrorKind::UnknownFunction,
            DispatchError::InvalidArguments { .. } => ErrorKind::InvalidArguments,
            DispatchError::MalformedArguments { .. } => ErrorKind::MalformedArguments,
            DispatchError::ExecutionFailed { .. } => ErrorKind::ExecutionFailed,
        }
    }

    /// Name of the function involved, as the model or registry spelled it.
    pub fn function(&self) -> &str {
        match self {
            DispatchError::UnknownFunction(function)
            | DispatchError::InvalidArguments { function, .. }
            | DispatchError::MalformedArguments { function, .. }
            | DispatchError::ExecutionFailed { function, .. } => function,
        }
    }

    /// Dispatch errors are fed back to the model in chained mode and
    /// surface to the caller otherwise.
    pub fn resolution(&self, chained: bool) -> Resolution {
        if chained {
            Resolution::Recoverable(self.kind(), self.to_string())
        } else {
            Resolution::Fatal(self.kind(), self.to_string())
        }
    }
}

/// Failures that end an `ask` call.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Backend(#[from] AiError),

    #[error(transparent)]
    Namespace(#[from] NamespaceError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("RoundLimit: model requested more than {0} consecutive function calls")]
    RoundLimit(u32),
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::Backend(_) => ErrorKind::Backend,
            SessionError::Namespace(_) => ErrorKind::Configuration,
            SessionError::Dispatch(err) => err.kind(),
            SessionError::RoundLimit(_) => ErrorKind::RoundLimit,
        }
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::Fatal(self.kind(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_function_display() {
        let err = DispatchError::UnknownFunction("teleport".into());
        assert_eq!(err.to_string(), "UnknownFunction: teleport");
        assert_eq!(err.function(), "teleport");
    }

    #[test]
    fn execution_failed_keeps_source() {
        let source: CallError = "disk full".into();
        let err = DispatchError::ExecutionFailed {
            function: "fs.write".into(),
            source,
        };
        assert_eq!(err.to_string(), "ExecutionFailed: fs.write: disk full");
        let cause = std::error::Error::source(&err).map(|e| e.to_string());
        assert_eq!(cause.as_deref(), Some("disk full"));
    }

    #[test]
    fn dispatch_resolution_depends_on_mode() {
        let err = DispatchError::MalformedArguments {
            function: "get_weather".into(),
            detail: "EOF while parsing".into(),
        };
        let chained = err.resolution(true);
        assert!(chained.is_recoverable());
        assert_eq!(chained.kind(), ErrorKind::MalformedArguments);

        let single = err.resolution(false);
        assert!(!single.is_recoverable());
        assert_eq!(
            single,
            Resolution::Fatal(
                ErrorKind::MalformedArguments,
                "MalformedArguments: get_weather: EOF while parsing".into()
            )
        );
    }

    #[test]
    fn session_errors_are_fatal() {
        let err = SessionError::from(AiError::Timeout);
        assert_eq!(err.kind(), ErrorKind::Backend);
        assert!(!err.resolution().is_recoverable());

        let err = SessionError::from(NamespaceError::DuplicateFunction("a.b".into()));
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "duplicate function name: a.b");

        let err = SessionError::RoundLimit(3);
        assert_eq!(err.kind(), ErrorKind::RoundLimit);
    }

    #[test]
    fn dispatch_kind_survives_wrapping() {
        let err = SessionError::from(DispatchError::UnknownFunction("x".into()));
        assert_eq!(err.kind(), ErrorKind::UnknownFunction);
        assert_eq!(err.to_string(), "UnknownFunction: x");
    }
}
