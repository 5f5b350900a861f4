use crate::cmd::CheckArgs;
use crate::exit::{schema_error, CliResult, SUCCESS};
use crate::output::{print_service, OutputFormat};

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let service = sockrpc_schema::from_file(&args.schema)
        .map_err(|err| schema_error("schema rejected", err))?;

    print_service(&service, format);
    Ok(SUCCESS)
}
