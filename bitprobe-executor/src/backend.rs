//! Target backend abstraction trait.
//!
//! Separates "how a target is started and observed" from the harness
//! logic, so the harness can be exercised against a recording backend.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use bitprobe_core::Invocation;

use crate::HarnessError;

/// Bounds applied while capturing the target's error output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureLimits {
    /// Maximum time to wait for the first line (or EOF).
    pub timeout: Duration,
    /// Maximum number of bytes captured.
    pub max_bytes: usize,
}

/// What a backend observed on the target's error stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// At least one byte was read, up to the first `\n` or the byte limit.
    Line(Vec<u8>),
    /// The stream reached EOF without producing any bytes.
    Silent,
    /// Neither a line nor EOF arrived within the timeout.
    TimedOut,
}

/// Starts targets and captures the first line of their error output.
///
/// Implementations must be `Send + Sync` to allow use from a shared
/// fuzzing entry point.
///
/// # Cancel Safety
/// Implementations must not leak the child process if the future is
/// dropped at any await point.
#[async_trait]
pub trait TargetBackend: Send + Sync {
    /// Run `invocation` and capture the first line of its error output.
    ///
    /// The child must be terminated and reaped before this returns, on
    /// every path.
    ///
    /// # Errors
    /// Returns [`HarnessError::SpawnFailed`] if the process cannot be started
    /// and [`HarnessError::OutputUnavailable`] if its error stream cannot be
    /// read.
    async fn capture_first_error_line(
        &self,
        invocation: &Invocation,
        limits: &CaptureLimits,
    ) -> Result<Capture, HarnessError>;

    /// Check that `program` can be started at all.
    ///
    /// # Errors
    /// Returns [`HarnessError::TargetNotFound`] if the executable is missing.
    async fn health_check(&self, program: &Path) -> Result<(), HarnessError>;
}
