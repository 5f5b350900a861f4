//! Deterministic code generator for sockrpc services.
//!
//! Consumes the schema graph and emits three translation units per service:
//! shared declarations, client stubs, and the server skeleton with its
//! method-id dispatcher. Rendering is a pure function of the graph, so an
//! unchanged schema yields byte-identical output on every run.
//!
//! The generated files mount as sibling modules under one parent:
//!
//! ```text
//! mod echo {
//!     pub mod echo_proto;
//!     pub mod echo_client;
//!     pub mod echo_server;
//! }
//! ```

pub mod client;
pub mod error;
pub mod naming;
pub mod proto;
pub mod server;

use std::path::{Path, PathBuf};

use sockrpc_schema::{Method, Service};
use tracing::info;

pub use error::{CodegenError, Result};

/// Paths of the three translation units emitted for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub proto: PathBuf,
    pub client: PathBuf,
    pub server: PathBuf,
}

/// Emits generated sources into an output directory.
pub struct Generator {
    out_dir: PathBuf,
}

impl Generator {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Render and write all three units for `service`.
    pub fn generate(&self, service: &Service) -> Result<GeneratedFiles> {
        std::fs::create_dir_all(&self.out_dir).map_err(|source| CodegenError::Io {
            path: self.out_dir.clone(),
            source,
        })?;

        let snake = naming::sanitize(&service.name);
        let files = GeneratedFiles {
            proto: self.write(&format!("{snake}_proto.rs"), &proto::render(service))?,
            client: self.write(&format!("{snake}_client.rs"), &client::render(service))?,
            server: self.write(&format!("{snake}_server.rs"), &server::render(service))?,
        };

        info!(
            service = %service.name,
            dir = %self.out_dir.display(),
            "generated service sources"
        );
        Ok(files)
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    fn write(&self, file: &str, contents: &str) -> Result<PathBuf> {
        let path = self.out_dir.join(file);
        std::fs::write(&path, contents).map_err(|source| CodegenError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Marker comment opening every generated file.
pub(crate) fn file_marker(service: &Service) -> String {
    format!(
        "// @generated by sockrpc from service {:?}; do not edit.\n",
        service.name
    )
}

/// Generated constant holding a method's wire id.
pub(crate) fn method_const(service: &Service, method: &Method) -> String {
    format!(
        "{}_{}_METHOD_ID",
        naming::upper(&service.name),
        naming::upper(&method.name)
    )
}

/// Return type of a trait method: nothing, one value, or a tuple.
pub(crate) fn returns_arrow(method: &Method) -> String {
    match method.returns.len() {
        0 => String::new(),
        _ => format!(" -> {}", returns_result(method)),
    }
}

/// Inner type of a stub's `Result`.
pub(crate) fn returns_result(method: &Method) -> String {
    match method.returns.len() {
        0 => "()".to_string(),
        1 => method.returns[0].ty.owned(),
        _ => format!(
            "({})",
            method
                .returns
                .iter()
                .map(|arg| arg.ty.owned())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

/// Expression a stub returns after decoding.
pub(crate) fn returns_value(method: &Method) -> String {
    match method.returns.len() {
        0 => "()".to_string(),
        1 => method.returns[0].name.clone(),
        _ => format!(
            "({})",
            method
                .returns
                .iter()
                .map(|arg| arg.name.clone())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    pub(crate) const ECHO_SCHEMA: &str = r#"{
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
                "returns": [{"loud": "char *"}, {"clipped": "bool"}]
            }
        }
    }"#;

    pub(crate) fn echo_service() -> Service {
        sockrpc_schema::from_json(ECHO_SCHEMA).unwrap()
    }

    fn make_out_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "sockrpc-codegen-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
        dir
    }

    #[test]
    fn generate_writes_three_marked_files() {
        let service = echo_service();
        let out_dir = make_out_dir("three-files");
        let files = Generator::new(&out_dir).generate(&service).unwrap();

        assert_eq!(files.proto, out_dir.join("echo_proto.rs"));
        assert_eq!(files.client, out_dir.join("echo_client.rs"));
        assert_eq!(files.server, out_dir.join("echo_server.rs"));

        for path in [&files.proto, &files.client, &files.server] {
            let contents = std::fs::read_to_string(path).unwrap();
            assert!(
                contents.starts_with("// @generated by sockrpc from service \"echo\""),
                "{path:?} lacks the generated-file marker"
            );
        }

        let _ = std::fs::remove_dir_all(&out_dir);
    }

    #[test]
    fn regeneration_is_byte_identical() {
        let service = echo_service();
        let first_dir = make_out_dir("idempotent-a");
        let second_dir = make_out_dir("idempotent-b");

        let first = Generator::new(&first_dir).generate(&service).unwrap();
        let reparsed = sockrpc_schema::from_json(ECHO_SCHEMA).unwrap();
        let second = Generator::new(&second_dir).generate(&reparsed).unwrap();

        for (a, b) in [
            (&first.proto, &second.proto),
            (&first.client, &second.client),
            (&first.server, &second.server),
        ] {
            assert_eq!(std::fs::read(a).unwrap(), std::fs::read(b).unwrap());
        }

        let _ = std::fs::remove_dir_all(&first_dir);
        let _ = std::fs::remove_dir_all(&second_dir);
    }

    #[test]
    fn symbol_names_carry_the_service_prefix() {
        let service = echo_service();
        assert_eq!(
            method_const(&service, &service.methods[0]),
            "ECHO_PING_METHOD_ID"
        );

        let dotted = sockrpc_schema::from_json(
            r#"{
                "service": "com.example.widgetd",
                "domain": "system",
                "version": 3,
                "methods": {"poke": {"id": 1}}
            }"#,
        )
        .unwrap();
        assert_eq!(
            method_const(&dotted, &dotted.methods[0]),
            "COM_EXAMPLE_WIDGETD_POKE_METHOD_ID"
        );
    }

    #[test]
    fn return_shapes_cover_zero_one_and_many() {
        let service = echo_service();
        let ping = &service.methods[0];
        let shout = &service.methods[1];

        assert_eq!(returns_result(ping), "Option<String>");
        assert_eq!(returns_value(ping), "answer");
        assert_eq!(returns_result(shout), "(Option<String>, bool)");
        assert_eq!(returns_value(shout), "(loud, clipped)");

        let bare = sockrpc_schema::from_json(
            r#"{
                "service": "s", "domain": "user", "version": 1,
                "methods": {"fire": {"id": 1}}
            }"#,
        )
        .unwrap();
        assert_eq!(returns_arrow(&bare.methods[0]), "");
        assert_eq!(returns_result(&bare.methods[0]), "()");
    }
}
