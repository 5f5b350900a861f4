use std::path::PathBuf;

/// Errors from code generation.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// The service graph could not be built from its description.
    #[error(transparent)]
    Schema(#[from] sockrpc_schema::SchemaError),

    /// A generated file could not be written.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CodegenError>;
