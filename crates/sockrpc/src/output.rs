use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use sockrpc_schema::{Argument, Service};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ServiceOutput<'a> {
    service: &'a str,
    domain: &'a str,
    version: u32,
    methods: Vec<MethodOutput<'a>>,
}

#[derive(Serialize)]
struct MethodOutput<'a> {
    name: &'a str,
    id: u32,
    accepts: Vec<String>,
    returns: Vec<String>,
}

pub fn print_service(service: &Service, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ServiceOutput {
                service: &service.name,
                domain: service.domain.as_str(),
                version: service.version,
                methods: service
                    .methods
                    .iter()
                    .map(|method| MethodOutput {
                        name: &method.name,
                        id: method.id,
                        accepts: argument_list(&method.accepts),
                        returns: argument_list(&method.returns),
                    })
                    .collect(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["METHOD", "ID", "ACCEPTS", "RETURNS"]);
            for method in &service.methods {
                table.add_row(vec![
                    method.name.clone(),
                    method.id.to_string(),
                    argument_list(&method.accepts).join(", "),
                    argument_list(&method.returns).join(", "),
                ]);
            }
            println!(
                "service {} (domain {}, version {})",
                service.name, service.domain, service.version
            );
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "service={} domain={} version={}",
                service.name, service.domain, service.version
            );
            for method in &service.methods {
                println!(
                    "  method={} id={} accepts=[{}] returns=[{}]",
                    method.name,
                    method.id,
                    argument_list(&method.accepts).join(", "),
                    argument_list(&method.returns).join(", ")
                );
            }
        }
    }
}

pub fn print_generated(paths: &[&std::path::Path], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let listed: Vec<String> = paths
                .iter()
                .map(|path| path.display().to_string())
                .collect();
            println!(
                "{}",
                serde_json::to_string(&listed).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            for path in paths {
                println!("{}", path.display());
            }
        }
    }
}

fn argument_list(args: &[Argument]) -> Vec<String> {
    args.iter()
        .map(|arg| format!("{}: {}", arg.name, arg.ty.spelling()))
        .collect()
}
