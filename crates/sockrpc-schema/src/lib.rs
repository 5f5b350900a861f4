//! Declarative service schema model for sockrpc.
//!
//! Parses a JSON service description and builds the Service → Method →
//! Argument graph the code generator consumes. Every argument is resolved
//! against the per-type marshaling table at build time; a schema that cannot
//! be represented on the wire is rejected here, never at runtime.
//!
//! The graph is constructed once and never mutated afterward.

pub mod error;
pub mod model;
pub mod parse;
pub mod types;

pub use error::{Result, SchemaError};
pub use sockrpc_registry::Domain;
pub use model::{Argument, Method, Service};
pub use parse::{from_file, from_json};
pub use types::{resolve, TypeInfo, WireKind};
