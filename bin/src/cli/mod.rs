use std::panic::AssertUnwindSafe;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use simplelog::LevelFilter;

mod extract;

/// Extracts schema-described tables from a disclosure report PDF, writing them as JSON.
#[derive(Parser, Debug)]
#[command(name = "disclosure-tables")]
pub struct Args {
    #[command(flatten)]
    extract: extract::Command,

    /// Logging level. Logs are written to stderr.
    #[arg(long, default_value = "Warn")]
    log_level: LevelFilter,
}

/// Runs `f`, reporting a panic as an error rather than unwinding out of `main`.
pub fn catch_panic<T>(f: impl FnOnce() -> Result<T>) -> Result<T> {
    std::panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        Err(anyhow!("internal error: {}", extraction::panic_message(&*payload)))
    })
}

pub fn run(args: &Args) -> Result<()> {
    simplelog::WriteLogger::init(
        args.log_level,
        simplelog::Config::default(),
        std::io::stderr(),
    )
    .with_context(|| "configuring logging")?;

    extract::run(&args.extract)
}
