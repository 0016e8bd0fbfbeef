use std::process::ExitCode;

use clap::Parser;

mod cli;
mod distpaths;
mod output;

fn main() -> ExitCode {
    let args = cli::Args::parse();
    match cli::catch_panic(|| cli::run(&args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", output::error_json(&err));
            ExitCode::FAILURE
        }
    }
}
