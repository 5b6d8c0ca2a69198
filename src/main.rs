use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;

use static_deploy::config::{Cli, Config};
use static_deploy::deployer;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config_file)
        .with_context(|| format!("loading {}", cli.config_file.display()))?;

    let start = Instant::now();
    let outcome = deployer::run(&config)?;

    println!(
        "Deployed version {} to {} ({} files copied, {} rewritten) in {:.2}s",
        outcome.version,
        outcome.target_dir.display(),
        outcome.files_copied,
        outcome.files_rewritten,
        start.elapsed().as_secs_f64()
    );

    Ok(ExitCode::SUCCESS)
}
