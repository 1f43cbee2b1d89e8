//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error raised by an external collaborator (data source, embedding model).
///
/// Carried through [`Error::Execution`] untouched.
pub type ExecutionError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error enum for the toolbox.
#[derive(Error, Debug)]
pub enum Error {
    /// A tool type identifier was registered twice (fatal at startup).
    #[error("tool type {0:?} already registered")]
    RegistrationConflict(String),

    /// A tool configuration document is malformed or incomplete.
    #[error("unable to decode config for tool {tool:?}: {message}")]
    ConfigDecode { tool: String, message: String },

    /// A raw parameter value disagrees with its declared kind.
    #[error("parameter {name:?}: expected {expected}, got {actual}")]
    ParameterTypeMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// A required parameter was absent from the caller input.
    #[error("missing required parameter: {0}")]
    MissingRequiredParameter(String),

    /// The declared source is unknown or lacks the required capability.
    #[error("unable to resolve source {source_name:?} for tool {tool:?}: {reason}")]
    SourceResolution {
        source_name: String,
        tool: String,
        reason: String,
    },

    /// A parameter references an embedding model that was not supplied.
    #[error("embedding model {model:?} for parameter {parameter:?} not found")]
    EmbeddingModelNotFound { parameter: String, model: String },

    /// Failure reported by the backing source, passed through verbatim.
    #[error("{0}")]
    Execution(#[source] ExecutionError),

    /// Validation errors for declarations (duplicate names, bad defaults).
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found (unknown tool, tool type or toolset).
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller lacks a verified auth service the tool requires.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Cancelled by the caller.
    #[error("operation cancelled: {0}")]
    Cancelled(String),

    /// Invocation exceeded its deadline.
    #[error("timeout: {0}")]
    Timeout(String),

    /// JSON serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable transport-level code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::ParameterTypeMismatch { .. }
            | Error::MissingRequiredParameter(_)
            | Error::Validation(_) => "INVALID_ARGUMENT",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Unauthorized(_) => "PERMISSION_DENIED",
            Error::SourceResolution { .. } | Error::EmbeddingModelNotFound { .. } => {
                "FAILED_PRECONDITION"
            }
            Error::Cancelled(_) => "CANCELLED",
            Error::Timeout(_) => "DEADLINE_EXCEEDED",
            Error::RegistrationConflict(_)
            | Error::ConfigDecode { .. }
            | Error::Execution(_)
            | Error::Serialization(_)
            | Error::Yaml(_)
            | Error::Io(_) => "INTERNAL",
        }
    }

    /// True when the caller supplied bad input and no execution happened.
    pub fn is_invalid_input(&self) -> bool {
        self.code() == "INVALID_ARGUMENT"
    }
}

// Convenience constructors
impl Error {
    pub fn config_decode(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigDecode {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn type_mismatch(
        name: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::ParameterTypeMismatch {
            name: name.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn source_resolution(
        source_name: impl Into<String>,
        tool: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::SourceResolution {
            source_name: source_name.into(),
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    pub fn execution(err: impl Into<ExecutionError>) -> Self {
        Self::Execution(err.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }
}
