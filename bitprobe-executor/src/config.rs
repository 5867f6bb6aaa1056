//! Harness configuration.
//!
//! Loaded from a JSON file or from `BITPROBE_*` environment variables. The
//! target executable is always supplied here; there is no built-in default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::HarnessError;

/// Environment variable naming a JSON config file.
pub const ENV_CONFIG: &str = "BITPROBE_CONFIG";
/// Environment variable naming the target executable.
pub const ENV_TARGET: &str = "BITPROBE_TARGET";
/// Environment variable overriding the read timeout, in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "BITPROBE_TIMEOUT_MS";
/// Environment variable naming the fault artifact directory.
pub const ENV_ARTIFACT_DIR: &str = "BITPROBE_ARTIFACT_DIR";
/// Environment variable enabling `halt_on_fault` (`1` or `true`).
pub const ENV_HALT_ON_FAULT: &str = "BITPROBE_HALT_ON_FAULT";

const DEFAULT_READ_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_REPORT_BUFFER_BYTES: usize = 1024;

/// The executable under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct TargetConfig {
    /// Path to the executable, absolute or resolved through `PATH`.
    pub program: PathBuf,

    /// Fixed arguments placed before the encoded input.
    #[serde(default)]
    pub args: Vec<String>,
}

impl TargetConfig {
    /// Target with no leading arguments.
    #[must_use]
    pub fn new(program: PathBuf) -> Self {
        Self { program, args: Vec::new() }
    }

    /// Target with fixed leading arguments.
    #[must_use]
    pub fn with_args(program: PathBuf, args: Vec<String>) -> Self {
        Self { program, args }
    }
}

/// Configuration for a [`crate::Harness`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct HarnessConfig {
    /// The executable under test.
    pub target: TargetConfig,

    /// Maximum time to wait for the first line of error output.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Maximum number of bytes captured from the error stream.
    #[serde(default = "default_report_buffer_bytes")]
    pub report_buffer_bytes: usize,

    /// Directory where faulting inputs are persisted, if any.
    #[serde(default)]
    pub artifact_dir: Option<PathBuf>,

    /// Abort the fuzzing run after recording the first fault.
    #[serde(default)]
    pub halt_on_fault: bool,

    /// Abort the fuzzing run on an infrastructure error.
    #[serde(default = "default_true")]
    pub halt_on_infra_error: bool,
}

fn default_read_timeout_ms() -> u64 {
    DEFAULT_READ_TIMEOUT_MS
}

fn default_report_buffer_bytes() -> usize {
    DEFAULT_REPORT_BUFFER_BYTES
}

fn default_true() -> bool {
    true
}

impl HarnessConfig {
    /// Create a config with defaults for everything but the target.
    #[must_use]
    pub fn new(target: TargetConfig) -> Self {
        Self {
            target,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            report_buffer_bytes: DEFAULT_REPORT_BUFFER_BYTES,
            artifact_dir: None,
            halt_on_fault: false,
            halt_on_infra_error: true,
        }
    }

    /// Builder-style override of the read timeout.
    #[must_use]
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Builder-style override of the artifact directory.
    #[must_use]
    pub fn with_artifact_dir(mut self, dir: PathBuf) -> Self {
        self.artifact_dir = Some(dir);
        self
    }

    /// The read timeout as a [`Duration`].
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Load and validate a JSON config file.
    ///
    /// # Errors
    /// Returns [`HarnessError::Io`] if the file cannot be read and
    /// [`HarnessError::Config`] if it does not parse or validate.
    pub fn from_json_file(path: &Path) -> Result<Self, HarnessError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| HarnessError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`HarnessError::Config`] if neither [`ENV_CONFIG`] nor
    /// [`ENV_TARGET`] is set, or a value is malformed.
    pub fn from_env() -> Result<Self, HarnessError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// [`ENV_CONFIG`] takes precedence; otherwise [`ENV_TARGET`] is required
    /// and the remaining variables override defaults.
    ///
    /// # Errors
    /// See [`HarnessConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HarnessError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_CONFIG) {
            return Self::from_json_file(Path::new(&path));
        }

        let program = lookup(ENV_TARGET).ok_or_else(|| {
            HarnessError::Config(format!("set {ENV_TARGET} or {ENV_CONFIG}"))
        })?;
        let mut config = Self::new(TargetConfig::new(PathBuf::from(program)));

        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            config.read_timeout_ms = raw.trim().parse().map_err(|_| {
                HarnessError::Config(format!("{ENV_TIMEOUT_MS} must be an integer, got {raw:?}"))
            })?;
        }
        if let Some(dir) = lookup(ENV_ARTIFACT_DIR) {
            config.artifact_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = lookup(ENV_HALT_ON_FAULT) {
            config.halt_on_fault = matches!(raw.trim(), "1" | "true" | "yes");
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde cannot express.
    ///
    /// # Errors
    /// Returns [`HarnessError::Config`] for an empty program path, a zero
    /// timeout, or a zero-sized report buffer.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.target.program.as_os_str().is_empty() {
            return Err(HarnessError::Config("target.program must not be empty".to_owned()));
        }
        if self.read_timeout_ms == 0 {
            return Err(HarnessError::Config("read_timeout_ms must be positive".to_owned()));
        }
        if self.report_buffer_bytes == 0 {
            return Err(HarnessError::Config("report_buffer_bytes must be positive".to_owned()));
        }
        Ok(())
    }
}
