use std::process::ExitCode;

use clap::Parser;
use schdiff_cli::SearchArgs;

fn main() -> ExitCode {
    let args = SearchArgs::parse();
    schdiff_cli::run(&args.global, |config, out| args.execute(config, out))
}
