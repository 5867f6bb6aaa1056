//! Error types for the executor crate.

use std::path::PathBuf;

/// Infrastructure errors raised while evaluating an input.
///
/// None of these mean the target misbehaved; findings are reported as a
/// [`bitprobe_core::Verdict`] instead.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum HarnessError {
    /// Target executable not found at the configured path or on `PATH`.
    #[error("target executable not found at {path}")]
    TargetNotFound { path: PathBuf },

    /// The operating system could not start the target.
    #[error("target spawn failed: {0}")]
    SpawnFailed(String),

    /// The target's error stream was not available for reading.
    #[error("target error stream unavailable: {0}")]
    OutputUnavailable(String),

    /// A fault artifact could not be written.
    #[error("failed to write artifact {path}: {source}")]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is missing or invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The async runtime backing the blocking entry point failed to start.
    #[error("runtime initialisation failed: {0}")]
    Runtime(String),

    /// Underlying I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
