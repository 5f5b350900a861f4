use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use sockrpc_registry::{validate_service_name, Domain};
use sockrpc_wire::MAX_ARG_COUNT;
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::model::{Argument, Method, Service};
use crate::types;

/// Declarative service description as it appears on disk.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServiceDecl {
    service: String,
    domain: String,
    version: u32,
    methods: BTreeMap<String, MethodDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MethodDecl {
    id: Option<u32>,
    #[serde(default)]
    accepts: Vec<BTreeMap<String, String>>,
    #[serde(default)]
    returns: Vec<BTreeMap<String, String>>,
}

/// Parse a JSON service description and build the validated graph.
pub fn from_json(input: &str) -> Result<Service> {
    let decl: ServiceDecl = serde_json::from_str(input)?;
    build(decl)
}

/// Read a description from disk and build the validated graph.
pub fn from_file(path: &Path) -> Result<Service> {
    let input = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_json(&input)
}

fn build(decl: ServiceDecl) -> Result<Service> {
    validate_service_name(&decl.service).map_err(|source| SchemaError::ServiceName {
        name: decl.service.clone(),
        source,
    })?;
    let domain: Domain = decl
        .domain
        .parse()
        .map_err(|_| SchemaError::UnknownDomain(decl.domain.clone()))?;

    let mut methods = Vec::with_capacity(decl.methods.len());
    for (name, method) in decl.methods {
        validate_identifier("method", &name)?;
        let id = method.id.ok_or_else(|| SchemaError::MissingMethodId {
            method: name.clone(),
        })?;
        let accepts = build_arguments(&name, method.accepts)?;
        let returns = build_arguments(&name, method.returns)?;
        methods.push(Method {
            name,
            id,
            accepts,
            returns,
        });
    }

    methods.sort_by_key(|method| method.id);
    for pair in methods.windows(2) {
        if pair[0].id == pair[1].id {
            return Err(SchemaError::DuplicateMethodId {
                id: pair[0].id,
                first: pair[0].name.clone(),
                second: pair[1].name.clone(),
            });
        }
    }

    debug!(
        service = %decl.service,
        version = decl.version,
        methods = methods.len(),
        "built service graph"
    );

    Ok(Service {
        name: decl.service,
        domain,
        version: decl.version,
        methods,
    })
}

fn build_arguments(
    method: &str,
    decls: Vec<BTreeMap<String, String>>,
) -> Result<Vec<Argument>> {
    if decls.len() > MAX_ARG_COUNT {
        return Err(SchemaError::TooManyArguments {
            method: method.to_string(),
            count: decls.len(),
            max: MAX_ARG_COUNT,
        });
    }

    let mut args: Vec<Argument> = Vec::with_capacity(decls.len());
    for (index, decl) in decls.into_iter().enumerate() {
        if decl.len() != 1 {
            return Err(SchemaError::MalformedArgument {
                method: method.to_string(),
                index,
            });
        }
        let (name, spelling) = decl
            .into_iter()
            .next()
            .ok_or_else(|| SchemaError::MalformedArgument {
                method: method.to_string(),
                index,
            })?;
        validate_identifier("argument", &name)?;
        if args.iter().any(|existing| existing.name == name) {
            return Err(SchemaError::DuplicateArgumentName {
                method: method.to_string(),
                argument: name,
            });
        }
        let ty = types::resolve(&spelling).ok_or_else(|| SchemaError::UnsupportedType {
            method: method.to_string(),
            argument: name.clone(),
            spelling: spelling.clone(),
        })?;
        args.push(Argument { name, index, ty });
    }
    Ok(args)
}

/// Method and argument names land verbatim in generated code, so they must
/// be plain Rust identifiers.
fn validate_identifier(what: &'static str, name: &str) -> Result<()> {
    let mut chars = name.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let rest_well = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !starts_well || !rest_well || RUST_KEYWORDS.contains(&name) || RESERVED.contains(&name) {
        return Err(SchemaError::InvalidIdentifier {
            what,
            name: name.to_string(),
        });
    }
    Ok(())
}

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while",
];

/// Locals the generated stubs and skeletons bind themselves.
const RESERVED: &[&str] = &["api", "header", "other", "reply", "request", "response", "stream"];

#[cfg(test)]
mod tests {
    use sockrpc_registry::Domain;

    use super::*;
    use crate::types::WireKind;

    const ECHO_SCHEMA: &str = r#"{
        "service": "echo",
        "domain": "user",
        "version": 1,
        "methods": {
            "ping": {
                "id": 1,
                "returns": [{"answer": "char *"}]
            },
            "shout": {
                "id": 2,
                "accepts": [{"message": "char *"}, {"volume": "int"}],
                "returns": [{"message": "char *"}]
            }
        }
    }"#;

    #[test]
    fn builds_the_echo_graph() {
        let service = from_json(ECHO_SCHEMA).unwrap();
        assert_eq!(service.name, "echo");
        assert_eq!(service.domain, Domain::User);
        assert_eq!(service.version, 1);
        assert_eq!(service.methods.len(), 2);

        let ping = &service.methods[0];
        assert_eq!((ping.name.as_str(), ping.id), ("ping", 1));
        assert!(ping.accepts.is_empty());
        assert_eq!(ping.returns.len(), 1);
        assert_eq!(ping.returns[0].name, "answer");
        assert_eq!(ping.returns[0].ty.kind(), WireKind::Text);

        let shout = &service.methods[1];
        assert_eq!(shout.id, 2);
        assert_eq!(shout.accepts[0].index, 0);
        assert_eq!(shout.accepts[1].index, 1);
        assert_eq!(shout.accepts[1].ty.kind(), WireKind::Fixed { size: 4 });
    }

    #[test]
    fn methods_are_ordered_by_id() {
        let input = r#"{
            "service": "s", "domain": "user", "version": 1,
            "methods": {
                "zebra": {"id": 1},
                "aardvark": {"id": 2}
            }
        }"#;
        let service = from_json(input).unwrap();
        let order: Vec<_> = service.methods.iter().map(|m| m.id).collect();
        assert_eq!(order, vec![1, 2]);
        assert_eq!(service.methods[0].name, "zebra");
    }

    #[test]
    fn missing_id_is_rejected() {
        let input = r#"{
            "service": "s", "domain": "user", "version": 1,
            "methods": {"ping": {}}
        }"#;
        assert!(matches!(
            from_json(input),
            Err(SchemaError::MissingMethodId { .. })
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let input = r#"{
            "service": "s", "domain": "user", "version": 1,
            "methods": {
                "a": {"id": 3},
                "b": {"id": 3}
            }
        }"#;
        assert!(matches!(
            from_json(input),
            Err(SchemaError::DuplicateMethodId { id: 3, .. })
        ));
    }

    #[test]
    fn unsupported_type_is_a_hard_failure() {
        let input = r#"{
            "service": "s", "domain": "user", "version": 1,
            "methods": {
                "m": {"id": 1, "accepts": [{"arg": "struct timeval"}]}
            }
        }"#;
        match from_json(input) {
            Err(SchemaError::UnsupportedType {
                method,
                argument,
                spelling,
            }) => {
                assert_eq!(method, "m");
                assert_eq!(argument, "arg");
                assert_eq!(spelling, "struct timeval");
            }
            other => panic!("expected UnsupportedType, got {other:?}"),
        }
    }

    #[test]
    fn unknown_domain_is_rejected() {
        let input = r#"{
            "service": "s", "domain": "network", "version": 1,
            "methods": {}
        }"#;
        assert!(matches!(
            from_json(input),
            Err(SchemaError::UnknownDomain(domain)) if domain == "network"
        ));
    }

    #[test]
    fn invalid_service_name_is_rejected() {
        let input = r#"{
            "service": ".hidden", "domain": "user", "version": 1,
            "methods": {}
        }"#;
        assert!(matches!(
            from_json(input),
            Err(SchemaError::ServiceName { .. })
        ));
    }

    #[test]
    fn too_many_arguments_are_rejected() {
        let args: Vec<String> = (0..MAX_ARG_COUNT + 1)
            .map(|i| format!("{{\"a{i}\": \"int\"}}"))
            .collect();
        let input = format!(
            r#"{{
                "service": "s", "domain": "user", "version": 1,
                "methods": {{"m": {{"id": 1, "accepts": [{}]}}}}
            }}"#,
            args.join(",")
        );
        assert!(matches!(
            from_json(&input),
            Err(SchemaError::TooManyArguments { count, .. }) if count == MAX_ARG_COUNT + 1
        ));
    }

    #[test]
    fn malformed_argument_entries_are_rejected() {
        let input = r#"{
            "service": "s", "domain": "user", "version": 1,
            "methods": {
                "m": {"id": 1, "accepts": [{"a": "int", "b": "int"}]}
            }
        }"#;
        assert!(matches!(
            from_json(input),
            Err(SchemaError::MalformedArgument { index: 0, .. })
        ));
    }

    #[test]
    fn unusable_identifiers_are_rejected() {
        for bad in ["1st", "with-dash", "loop", ""] {
            let input = format!(
                r#"{{
                    "service": "s", "domain": "user", "version": 1,
                    "methods": {{"m": {{"id": 1, "accepts": [{{{bad:?}: "int"}}]}}}}
                }}"#
            );
            assert!(
                matches!(
                    from_json(&input),
                    Err(SchemaError::InvalidIdentifier { .. })
                ),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn duplicate_argument_names_are_rejected() {
        let input = r#"{
            "service": "s", "domain": "user", "version": 1,
            "methods": {
                "m": {"id": 1, "accepts": [{"x": "int"}], "returns": [{"x": "int"}]}
            }
        }"#;
        // Reuse across directions is fine; reuse within one is not.
        from_json(input).unwrap();

        let input = r#"{
            "service": "s", "domain": "user", "version": 1,
            "methods": {
                "m": {"id": 1, "accepts": [{"x": "int"}, {"x": "char *"}]}
            }
        }"#;
        assert!(matches!(
            from_json(input),
            Err(SchemaError::DuplicateArgumentName { .. })
        ));
    }

    #[test]
    fn generator_reserved_names_are_rejected() {
        let input = r#"{
            "service": "s", "domain": "user", "version": 1,
            "methods": {
                "m": {"id": 1, "accepts": [{"stream": "int"}]}
            }
        }"#;
        assert!(matches!(
            from_json(input),
            Err(SchemaError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let input = r#"{
            "service": "s", "domain": "user", "version": 1,
            "methods": {}, "extra": true
        }"#;
        assert!(matches!(from_json(input), Err(SchemaError::InvalidJson(_))));
    }
}
