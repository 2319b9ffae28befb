use std::process::ExitCode;

use clap::Parser;
use schdiff_cli::CompareArgs;

fn main() -> ExitCode {
    let args = CompareArgs::parse();
    schdiff_cli::run(&args.global, |config, out| args.execute(config, out))
}
