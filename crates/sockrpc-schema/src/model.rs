use sockrpc_registry::Domain;

use crate::types::TypeInfo;

/// A named, versioned service: the root of the compile-time graph.
///
/// Built once by [`crate::parse`] and never mutated; methods are ordered by
/// id so generation is deterministic.
#[derive(Debug, Clone)]
pub struct Service {
    pub name: String,
    pub domain: Domain,
    pub version: u32,
    pub methods: Vec<Method>,
}

/// One method of a service.
#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    /// Unique within the service; the wire-level dispatch key.
    pub id: u32,
    pub accepts: Vec<Argument>,
    pub returns: Vec<Argument>,
}

/// One declared argument with its resolved marshaling entry.
#[derive(Debug, Clone)]
pub struct Argument {
    pub name: String,
    /// 0-based position, equal to the argument's segment index on the wire.
    pub index: usize,
    pub ty: TypeInfo,
}
