//! Client stub unit: one function per method performing the full call path
//! over an explicitly passed stream.

use sockrpc_schema::{Method, Service};

use crate::naming::sanitize;
use crate::{file_marker, method_const, returns_result, returns_value};

/// Render the client translation unit for a service.
pub fn render(service: &Service) -> String {
    let snake = sanitize(&service.name);
    let mut out = String::new();

    out.push_str(&file_marker(service));
    out.push('\n');
    out.push_str("use sockrpc_registry::ServiceStream;\n");
    out.push_str("use sockrpc_wire::{Message, MessageBuilder, Result};\n\n");
    out.push_str(&format!("use super::{snake}_proto::*;\n"));

    for method in &service.methods {
        out.push('\n');
        render_stub(&mut out, service, method);
    }

    out
}

fn render_stub(out: &mut String, service: &Service, method: &Method) {
    let snake = sanitize(&service.name);
    let id_const = method_const(service, method);

    let mut params = String::new();
    for arg in &method.accepts {
        params.push_str(&format!(", {}: {}", arg.name, arg.ty.param()));
    }

    out.push_str(&format!(
        "/// Call `{}` on a connected `{}` stream. The connection carries this\n\
         /// one call and is consumed.\n",
        method.name, service.name
    ));
    out.push_str(&format!(
        "pub fn {snake}_{}(mut stream: ServiceStream{params}) -> Result<{}> {{\n",
        method.name,
        returns_result(method)
    ));

    let request_binding = if method.accepts.is_empty() {
        "let request"
    } else {
        "let mut request"
    };
    out.push_str(&format!(
        "    {request_binding} = MessageBuilder::new({id_const});\n"
    ));
    for arg in &method.accepts {
        out.push_str(&format!("    {}\n", arg.ty.encode_stmt("request", &arg.name)));
    }
    out.push_str("    request.write_to(&mut stream)?;\n\n");

    out.push_str("    let reply = Message::read_from(&mut stream)?;\n");
    out.push_str(&format!("    reply.header().expect_method({id_const})?;\n"));
    out.push_str(&format!(
        "    reply.expect_argc({})?;\n",
        method.returns.len()
    ));
    for arg in &method.returns {
        out.push_str(&format!(
            "    let {} = {};\n",
            arg.name,
            arg.ty.decode_expr("reply", arg.index)
        ));
    }
    out.push_str(&format!("    Ok({})\n", returns_value(method)));
    out.push_str("}\n");
}
