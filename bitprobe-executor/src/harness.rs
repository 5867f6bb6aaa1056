//! Input evaluation: encodes one fuzz input, runs the target with it, and
//! classifies the target's error output.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use bitprobe_core::{Invocation, Verdict};
use serde::Serialize;

use crate::backend::{Capture, CaptureLimits, TargetBackend};
use crate::{HarnessConfig, HarnessError};

/// Evaluates fuzz inputs against the configured target.
///
/// The harness:
/// 1. Skips empty inputs without starting anything
/// 2. Encodes the input as a bit string argument
/// 3. Runs the target through the backend, capturing one line of stderr
/// 4. Classifies the capture as a [`Verdict`]
///
/// Each call is independent; only the statistics counters are shared.
pub struct Harness<B: TargetBackend> {
    backend: B,
    config: HarnessConfig,
    stats: Counters,
}

/// Point-in-time copy of the harness counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HarnessStats {
    /// Inputs that reached the target.
    pub executions: u64,
    /// Empty inputs skipped before encoding.
    pub skipped_empty: u64,
    /// Executions with output on the error stream.
    pub faults: u64,
    /// Executions that hit the read timeout.
    pub timeouts: u64,
    /// Evaluations that failed with an infrastructure error.
    pub infra_errors: u64,
}

#[derive(Debug, Default)]
struct Counters {
    executions: AtomicU64,
    skipped_empty: AtomicU64,
    faults: AtomicU64,
    timeouts: AtomicU64,
    infra_errors: AtomicU64,
}

impl<B: TargetBackend> Harness<B> {
    /// Create a harness for `config` backed by `backend`.
    #[must_use]
    pub fn new(backend: B, config: HarnessConfig) -> Self {
        Self { backend, config, stats: Counters::default() }
    }

    /// The configuration this harness was built with.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Evaluate one input.
    ///
    /// # Errors
    /// Returns [`HarnessError::SpawnFailed`] if the target cannot be started
    /// and [`HarnessError::OutputUnavailable`] if its error stream cannot be
    /// read. Target misbehaviour is never an error; it is a [`Verdict`].
    pub async fn evaluate(&self, data: &[u8]) -> Result<Verdict, HarnessError> {
        if data.is_empty() {
            self.stats.skipped_empty.fetch_add(1, Ordering::Relaxed);
            return Ok(Verdict::Pass);
        }

        let invocation = Invocation::new(&self.config.target.program, &self.config.target.args, data);
        let limits = CaptureLimits {
            timeout: self.config.read_timeout(),
            max_bytes: self.config.report_buffer_bytes,
        };

        tracing::info!(command = %invocation, input_len = data.len(), "running target");

        let wall_start = Instant::now();
        let capture = match self.backend.capture_first_error_line(&invocation, &limits).await {
            Ok(capture) => capture,
            Err(e) => {
                self.stats.infra_errors.fetch_add(1, Ordering::Relaxed);
                tracing::error!(
                    program = %self.config.target.program.display(),
                    error = %e,
                    "unable to run target"
                );
                return Err(e);
            }
        };
        self.stats.executions.fetch_add(1, Ordering::Relaxed);
        let elapsed_ms = wall_start.elapsed().as_millis();

        let verdict = match capture {
            Capture::Silent => Verdict::Pass,
            Capture::Line(bytes) => {
                self.stats.faults.fetch_add(1, Ordering::Relaxed);
                Verdict::Fault { report: report_text(&bytes) }
            }
            Capture::TimedOut => {
                self.stats.timeouts.fetch_add(1, Ordering::Relaxed);
                Verdict::TimedOut { after: limits.timeout }
            }
        };

        match &verdict {
            Verdict::Pass => tracing::debug!(elapsed_ms, "target passed"),
            other => tracing::warn!(elapsed_ms, verdict = %other, "target fault detected"),
        }

        Ok(verdict)
    }

    /// Check that the configured target exists.
    ///
    /// # Errors
    /// Propagates [`TargetBackend::health_check`] errors.
    pub async fn health_check(&self) -> Result<(), HarnessError> {
        self.backend.health_check(&self.config.target.program).await
    }

    /// Snapshot of the counters accumulated so far.
    #[must_use]
    pub fn stats(&self) -> HarnessStats {
        HarnessStats {
            executions: self.stats.executions.load(Ordering::Relaxed),
            skipped_empty: self.stats.skipped_empty.load(Ordering::Relaxed),
            faults: self.stats.faults.load(Ordering::Relaxed),
            timeouts: self.stats.timeouts.load(Ordering::Relaxed),
            infra_errors: self.stats.infra_errors.load(Ordering::Relaxed),
        }
    }
}

/// Captured stderr bytes as report text, without the trailing line terminator.
fn report_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.trim_end_matches(['\n', '\r']).to_owned()
}
