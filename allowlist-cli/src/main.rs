mod args;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> eyre::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = args::Cli::parse();
    let mut stdout = std::io::stdout().lock();
    match commands::run(cli.command, &mut stdout) {
        Ok(code) => Ok(code),
        Err(error) => {
            tracing::error!(error = ?error, "allowlist command failed");
            Err(error)
        }
    }
}
