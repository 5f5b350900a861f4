//! Server skeleton unit: per-method unmarshal → invoke → marshal → respond
//! handlers plus the method-id dispatcher.

use sockrpc_schema::{Method, Service};

use crate::naming::{pascal, sanitize};
use crate::{file_marker, method_const};

/// Render the server translation unit for a service.
pub fn render(service: &Service) -> String {
    let snake = sanitize(&service.name);
    let trait_name = format!("{}Api", pascal(&service.name));
    let mut out = String::new();

    out.push_str(&file_marker(service));
    out.push('\n');
    out.push_str("use sockrpc_registry::ServiceStream;\n");
    out.push_str("use sockrpc_wire::{Message, MessageBuilder, MessageHeader, Result, WireError};\n\n");
    out.push_str(&format!("use super::{snake}_proto::*;\n\n"));

    out.push_str(
        "/// Read one request from an accepted connection, route it by method id,\n\
         /// and write the response. Any failure tears the call down; the client\n\
         /// retries on a fresh connection.\n",
    );
    out.push_str(&format!(
        "pub fn {snake}_dispatch<S: {trait_name}>(mut stream: ServiceStream, api: &mut S) -> Result<()> {{\n"
    ));
    out.push_str("    let header = MessageHeader::read_from(&mut stream)?;\n");
    out.push_str("    match header.method() {\n");
    for method in &service.methods {
        out.push_str(&format!(
            "        {} => handle_{}(header, stream, api),\n",
            method_const(service, method),
            method.name
        ));
    }
    out.push_str("        other => Err(WireError::MethodNotFound(other)),\n");
    out.push_str("    }\n");
    out.push_str("}\n");

    for method in &service.methods {
        out.push('\n');
        render_handler(&mut out, service, method, &trait_name);
    }

    out
}

fn render_handler(out: &mut String, service: &Service, method: &Method, trait_name: &str) {
    let id_const = method_const(service, method);

    out.push_str(&format!(
        "fn handle_{}<S: {trait_name}>(header: MessageHeader, mut stream: ServiceStream, api: &mut S) -> Result<()> {{\n",
        method.name
    ));
    out.push_str("    let request = Message::read_payload(header, &mut stream)?;\n");
    out.push_str(&format!(
        "    request.expect_argc({})?;\n",
        method.accepts.len()
    ));
    for arg in &method.accepts {
        out.push_str(&format!(
            "    let {} = {};\n",
            arg.name,
            arg.ty.decode_expr("request", arg.index)
        ));
    }
    out.push('\n');

    let call_args = method
        .accepts
        .iter()
        .map(|arg| arg.name.clone())
        .collect::<Vec<_>>()
        .join(", ");
    match method.returns.len() {
        0 => out.push_str(&format!("    api.{}({call_args});\n", method.name)),
        1 => out.push_str(&format!(
            "    let {} = api.{}({call_args});\n",
            method.returns[0].name, method.name
        )),
        _ => out.push_str(&format!(
            "    let ({}) = api.{}({call_args});\n",
            method
                .returns
                .iter()
                .map(|arg| arg.name.clone())
                .collect::<Vec<_>>()
                .join(", "),
            method.name
        )),
    }
    out.push('\n');

    let response_binding = if method.returns.is_empty() {
        "let response"
    } else {
        "let mut response"
    };
    out.push_str(&format!(
        "    {response_binding} = MessageBuilder::new({id_const});\n"
    ));
    for arg in &method.returns {
        let var = if arg.ty.is_pointer() {
            format!("{}.as_deref()", arg.name)
        } else {
            arg.name.clone()
        };
        out.push_str(&format!("    {}\n", arg.ty.encode_stmt("response", &var)));
    }
    out.push_str("    response.write_to(&mut stream)\n");
    out.push_str("}\n");
}
