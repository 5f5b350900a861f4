use sockrpc_codegen::Generator;

use crate::cmd::GenerateArgs;
use crate::exit::{codegen_error, schema_error, CliResult, SUCCESS};
use crate::output::{print_generated, OutputFormat};

pub fn run(args: GenerateArgs, format: OutputFormat) -> CliResult<i32> {
    let service = sockrpc_schema::from_file(&args.schema)
        .map_err(|err| schema_error("schema rejected", err))?;

    let generator = Generator::new(&args.out_dir);
    let files = generator
        .generate(&service)
        .map_err(|err| codegen_error("generation failed", err))?;

    print_generated(
        &[
            files.proto.as_path(),
            files.client.as_path(),
            files.server.as_path(),
        ],
        format,
    );
    Ok(SUCCESS)
}
