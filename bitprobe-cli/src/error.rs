//! Error types for the CLI crate.

use std::path::PathBuf;

/// Errors that end a CLI run.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CliError {
    /// An error propagated from the executor layer.
    #[error("harness error: {0}")]
    Harness(#[from] bitprobe_executor::HarnessError),

    /// The configuration file could not be loaded, or the resolved
    /// configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[source] bitprobe_executor::HarnessError),

    /// A `--bits` argument could not be decoded.
    #[error("invalid --bits value: {0}")]
    InvalidBits(#[from] bitprobe_core::CoreError),

    /// An input file could not be read.
    #[error("cannot read input {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither a config file nor a target was given.
    #[error("no target configured: pass --target or --config")]
    NoTarget,

    /// Nothing to replay.
    #[error("no inputs given: pass --bits or one or more files")]
    NoInputs,
}

impl CliError {
    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Harness(_) => 2,
            _ => 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harness_errors_exit_with_2() {
        let err = CliError::Harness(bitprobe_executor::HarnessError::SpawnFailed("gone".to_owned()));
        assert_eq!(err.exit_code(), 2, "infrastructure errors must exit with 2");
    }

    #[test]
    fn usage_errors_exit_with_64() {
        assert_eq!(CliError::NoInputs.exit_code(), 64);
        assert_eq!(CliError::NoTarget.exit_code(), 64);
    }

    #[test]
    fn config_errors_exit_with_64() {
        let err = CliError::Config(bitprobe_executor::HarnessError::Config(
            "read_timeout_ms must be greater than zero".to_owned(),
        ));
        assert_eq!(err.exit_code(), 64, "a bad configuration is a usage error");
        assert!(err.to_string().starts_with("invalid configuration:"), "got {err}");
    }

    #[test]
    fn display_includes_message() {
        let err = CliError::InvalidBits(bitprobe_core::CoreError::BitStringLength { len: 3 });
        let msg = err.to_string();
        assert!(msg.contains("multiple of 8"), "Display must include the cause, got {msg}");
    }
}
