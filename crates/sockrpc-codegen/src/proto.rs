//! Shared declaration unit: service constants, method ids, and the service
//! trait both generated sides agree on.

use sockrpc_schema::{Domain, Method, Service};

use crate::naming::{pascal, upper};
use crate::{file_marker, method_const, returns_arrow};

/// Render the shared declaration unit for a service.
pub fn render(service: &Service) -> String {
    let mut out = String::new();
    let service_upper = upper(&service.name);
    let trait_name = format!("{}Api", pascal(&service.name));

    out.push_str(&file_marker(service));
    out.push('\n');
    out.push_str("use sockrpc_registry::Domain;\n\n");

    out.push_str(&format!(
        "pub const {service_upper}_SERVICE_NAME: &str = {:?};\n",
        service.name
    ));
    out.push_str(&format!(
        "pub const {service_upper}_SERVICE_DOMAIN: Domain = Domain::{};\n",
        domain_variant(service.domain)
    ));
    out.push_str(&format!(
        "pub const {service_upper}_SERVICE_VERSION: u32 = {};\n\n",
        service.version
    ));

    for method in &service.methods {
        out.push_str(&format!(
            "pub const {}: u32 = {};\n",
            method_const(service, method),
            method.id
        ));
    }
    if !service.methods.is_empty() {
        out.push('\n');
    }

    out.push_str(&format!(
        "/// Call signatures implemented by the real `{}` service.\n",
        service.name
    ));
    out.push_str(&format!("pub trait {trait_name} {{\n"));
    for method in &service.methods {
        out.push_str(&format!(
            "    fn {}({}){};\n",
            method.name,
            trait_params(method),
            returns_arrow(method)
        ));
    }
    out.push_str("}\n");

    out
}

fn domain_variant(domain: Domain) -> &'static str {
    match domain {
        Domain::System => "System",
        Domain::User => "User",
    }
}

fn trait_params(method: &Method) -> String {
    let mut params = String::from("&mut self");
    for arg in &method.accepts {
        params.push_str(&format!(", {}: {}", arg.name, arg.ty.owned()));
    }
    params
}
