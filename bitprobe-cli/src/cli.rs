//! Command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use bitprobe_executor::config::{ENV_CONFIG, ENV_TARGET, ENV_TIMEOUT_MS};
use bitprobe_executor::{HarnessConfig, TargetConfig};
use clap::{Args, Parser, Subcommand};

use crate::CliError;

#[derive(Parser, Debug)]
#[command(name = "bitprobe")]
#[command(author, version, about = "Replay inputs against a black-box fuzzing target", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalOpts {
    /// JSON harness config file
    #[arg(long, global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Target executable (ignored when --config is given)
    #[arg(long, global = true, env = ENV_TARGET)]
    pub target: Option<PathBuf>,

    /// Fixed argument passed before the encoded input (repeatable)
    #[arg(long = "target-arg", global = true, allow_hyphen_values = true)]
    pub target_args: Vec<String>,

    /// Read timeout in milliseconds
    #[arg(long, global = true, env = ENV_TIMEOUT_MS)]
    pub timeout_ms: Option<u64>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate inputs once each and print one JSON line per input
    Replay {
        /// Input given as a bit string, e.g. copied from a logged command
        #[arg(long)]
        bits: Option<String>,

        /// Files holding raw inputs
        files: Vec<PathBuf>,
    },
    /// Check that the target executable can be found
    Check,
}

impl GlobalOpts {
    /// Resolve the harness configuration from the flags.
    ///
    /// # Errors
    /// Returns [`CliError::NoTarget`] if neither `--config` nor `--target`
    /// is set, and [`CliError::Config`] if the config file cannot be loaded
    /// or the result fails validation.
    pub fn harness_config(&self) -> Result<HarnessConfig, CliError> {
        let mut config = match (&self.config, &self.target) {
            (Some(path), _) => HarnessConfig::from_json_file(path).map_err(CliError::Config)?,
            (None, Some(program)) => HarnessConfig::new(TargetConfig::with_args(
                program.clone(),
                self.target_args.clone(),
            )),
            (None, None) => return Err(CliError::NoTarget),
        };
        if let Some(ms) = self.timeout_ms {
            config = config.with_read_timeout(Duration::from_millis(ms));
        }
        config.validate().map_err(CliError::Config)?;
        Ok(config)
    }

    /// Default log filter for the chosen verbosity.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
