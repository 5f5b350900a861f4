use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod check;
pub mod generate;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate client stub and server skeleton sources from a schema.
    Generate(GenerateArgs),
    /// Validate a schema and print its method table.
    Check(CheckArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Generate(args) => generate::run(args, format),
        Command::Check(args) => check::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Schema file to compile.
    pub schema: PathBuf,
    /// Directory the generated sources are written to.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema file to validate.
    pub schema: PathBuf,
}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
