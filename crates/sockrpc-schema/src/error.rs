use std::path::PathBuf;

/// Errors from parsing or building a service schema.
///
/// All of these abort generation: they signal a wire format that cannot be
/// produced correctly, not a transient runtime condition.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The description is not valid JSON or is missing required fields.
    #[error("schema is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The schema file could not be read.
    #[error("failed to read schema {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The service name violates the registry naming rules.
    #[error("invalid service name {name:?}: {source}")]
    ServiceName {
        name: String,
        #[source]
        source: sockrpc_registry::RegistryError,
    },

    /// The transport domain is not `system` or `user`.
    #[error("unsupported domain {0:?} (expected \"system\" or \"user\")")]
    UnknownDomain(String),

    /// A method declaration has no id.
    #[error("method {method:?} is missing its id")]
    MissingMethodId { method: String },

    /// Two methods share one id.
    #[error("methods {first:?} and {second:?} share id {id}")]
    DuplicateMethodId {
        id: u32,
        first: String,
        second: String,
    },

    /// A direction declares more arguments than a message can carry.
    #[error("method {method:?} declares {count} arguments, max {max}")]
    TooManyArguments {
        method: String,
        count: usize,
        max: usize,
    },

    /// Two arguments of one direction share a name.
    #[error("method {method:?} declares argument {argument:?} twice")]
    DuplicateArgumentName { method: String, argument: String },

    /// An argument entry is not a single name/type pair.
    #[error("method {method:?} argument {index} must be a single name/type pair")]
    MalformedArgument { method: String, index: usize },

    /// A method or argument name cannot be spliced into generated code.
    #[error("{what} {name:?} is not a usable identifier")]
    InvalidIdentifier { what: &'static str, name: String },

    /// A declared type has no entry in the marshaling table.
    #[error("method {method:?} argument {argument:?} has unsupported type {spelling:?}")]
    UnsupportedType {
        method: String,
        argument: String,
        spelling: String,
    },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
