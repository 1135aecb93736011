//! tagmigrate
//!
//! Generates Rails migrations and column-name accessors from Go structs.

use std::process::ExitCode;

use clap::Parser;
use tagmigrate_cli::{Args, exit_code, init_logging, run};

fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr; stdout may carry the migration script
    init_logging(args.log_level());

    exit_code(run(&args))
}
