//! Entry point for the `bitprobe` binary.

use bitprobe_cli::cli::{Cli, Command};
use bitprobe_cli::{commands, CliError};
use bitprobe_executor::{Harness, LocalProcessBackend};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.global.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!(error = %e, "bitprobe failed");
            eprintln!("bitprobe: {e}");
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<i32, CliError> {
    let config = cli.global.harness_config()?;
    let harness = Harness::new(LocalProcessBackend::new(), config);
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::Replay { bits, files } => {
            let inputs = commands::load_inputs(bits.as_deref(), &files)?;
            let summary = commands::replay(&harness, &inputs, &mut stdout).await?;
            Ok(summary.exit_code())
        }
        Command::Check => {
            commands::check(&harness, &mut stdout).await?;
            Ok(0)
        }
    }
}
