//! Local process backend.
//!
//! Starts the target directly from an argument vector (no shell), discards
//! its standard output, and reads its standard error. This is the
//! behaviour of `target <bits> 2>&1 1>/dev/null` without the shell.

use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use bitprobe_core::Invocation;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::time::Instant;

use crate::backend::{Capture, CaptureLimits, TargetBackend};
use crate::HarnessError;

/// Runs targets as local child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProcessBackend;

impl LocalProcessBackend {
    /// Create a new backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TargetBackend for LocalProcessBackend {
    async fn capture_first_error_line(
        &self,
        invocation: &Invocation,
        limits: &CaptureLimits,
    ) -> Result<Capture, HarnessError> {
        let deadline = Instant::now() + limits.timeout;

        let mut child = Command::new(invocation.program())
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                HarnessError::SpawnFailed(format!("exec {}: {e}", invocation.program().display()))
            })?;

        let Some(stderr) = child.stderr.take() else {
            reap(&mut child, Duration::ZERO).await;
            return Err(HarnessError::OutputUnavailable("stderr not piped".to_owned()));
        };

        let mut line = Vec::with_capacity(limits.max_bytes.min(1024));
        let read =
            tokio::time::timeout_at(deadline, read_first_line(stderr, limits.max_bytes, &mut line))
                .await;

        let capture = match read {
            // Bytes read before the deadline are still an error report.
            Err(_) if !line.is_empty() => {
                tracing::debug!(bytes = line.len(), "target stalled mid-line");
                reap(&mut child, Duration::ZERO).await;
                return Ok(Capture::Line(line));
            }
            Err(_) => {
                tracing::debug!(timeout_ms = limits.timeout.as_millis(), "target read timed out");
                reap(&mut child, Duration::ZERO).await;
                return Ok(Capture::TimedOut);
            }
            Ok(Err(e)) => {
                reap(&mut child, Duration::ZERO).await;
                return Err(HarnessError::OutputUnavailable(e.to_string()));
            }
            Ok(Ok(())) if line.is_empty() => Capture::Silent,
            Ok(Ok(())) => Capture::Line(line),
        };

        // A silent target closed its error stream; let it exit on its own
        // within what is left of the timeout before killing it.
        let grace = match capture {
            Capture::Silent => deadline.saturating_duration_since(Instant::now()),
            _ => Duration::ZERO,
        };
        reap(&mut child, grace).await;

        Ok(capture)
    }

    async fn health_check(&self, program: &Path) -> Result<(), HarnessError> {
        which_binary(program)
    }
}

/// Append up to `max_bytes` to `buf`, stopping after the first `\n`.
///
/// Bytes land in `buf` as they arrive, so they survive the future being
/// dropped at the deadline. `buf` stays empty only if the stream hit EOF
/// first.
async fn read_first_line<R>(reader: R, max_bytes: usize, buf: &mut Vec<u8>) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    let mut limited = BufReader::new(reader).take(limit);
    limited.read_until(b'\n', buf).await?;
    Ok(())
}

/// Wait up to `grace` for the child to exit, then kill and reap it.
async fn reap(child: &mut Child, grace: Duration) {
    match tokio::time::timeout(grace, child.wait()).await {
        Ok(Ok(status)) => {
            tracing::debug!(%status, "target exited");
            return;
        }
        Ok(Err(e)) => tracing::debug!(error = %e, "waiting for target failed"),
        Err(_) => {}
    }
    if let Err(e) = child.kill().await {
        tracing::warn!(error = %e, "failed to kill target");
    }
}

/// Verify a binary exists either at the given path or in PATH.
fn which_binary(path: &Path) -> Result<(), HarnessError> {
    if path.is_absolute() || path.components().count() > 1 {
        if path.is_file() {
            return Ok(());
        }
        return Err(HarnessError::TargetNotFound { path: path.to_owned() });
    }

    // Bare name: check PATH
    let found = std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(path).is_file()))
        .unwrap_or(false);

    if found {
        Ok(())
    } else {
        Err(HarnessError::TargetNotFound { path: path.to_owned() })
    }
}
