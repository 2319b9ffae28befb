use std::process::ExitCode;

use clap::Parser;
use schdiff_cli::ParseArgs;

fn main() -> ExitCode {
    let args = ParseArgs::parse();
    schdiff_cli::run(&args.global, |config, out| args.execute(config, out))
}
