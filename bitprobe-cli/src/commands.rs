//! Subcommand implementations.

use std::io::Write;
use std::path::PathBuf;

use bitprobe_core::{decode_bits, ContentHash, Verdict};
use bitprobe_executor::{Harness, TargetBackend};
use serde::Serialize;

use crate::CliError;

/// One input to replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayInput {
    /// Where the input came from: a file path or `--bits`.
    pub label: String,
    /// Raw input bytes.
    pub data: Vec<u8>,
}

/// One line of replay output.
#[derive(Debug, Serialize)]
pub struct ReplayLine<'a> {
    pub input: &'a str,
    pub input_hash: String,
    pub input_len: usize,
    #[serde(flatten)]
    pub verdict: &'a Verdict,
}

/// Totals for a replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub passed: usize,
    pub faults: usize,
}

impl ReplaySummary {
    /// `0` when every input passed, `1` otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(self.faults > 0)
    }
}

/// Collect the inputs named on the command line.
///
/// # Errors
/// Returns [`CliError::InvalidBits`] for a malformed bit string,
/// [`CliError::ReadInput`] for an unreadable file, and
/// [`CliError::NoInputs`] if nothing was given.
pub fn load_inputs(bits: Option<&str>, files: &[PathBuf]) -> Result<Vec<ReplayInput>, CliError> {
    let mut inputs = Vec::with_capacity(files.len() + 1);
    if let Some(bits) = bits {
        inputs.push(ReplayInput { label: "--bits".to_owned(), data: decode_bits(bits.trim())? });
    }
    for path in files {
        let data = std::fs::read(path)
            .map_err(|source| CliError::ReadInput { path: path.clone(), source })?;
        inputs.push(ReplayInput { label: path.display().to_string(), data });
    }
    if inputs.is_empty() {
        return Err(CliError::NoInputs);
    }
    Ok(inputs)
}

/// Evaluate each input once, writing one JSON line per input to `out`.
///
/// # Errors
/// Stops at the first infrastructure error and returns it as
/// [`CliError::Harness`]; I/O errors on `out` surface the same way.
pub async fn replay<B, W>(
    harness: &Harness<B>,
    inputs: &[ReplayInput],
    out: &mut W,
) -> Result<ReplaySummary, CliError>
where
    B: TargetBackend,
    W: Write,
{
    let mut summary = ReplaySummary::default();
    for input in inputs {
        let verdict = harness.evaluate(&input.data).await?;
        if verdict.is_fault() {
            summary.faults += 1;
        } else {
            summary.passed += 1;
        }

        let line = ReplayLine {
            input: &input.label,
            input_hash: ContentHash::of(&input.data).to_string(),
            input_len: input.data.len(),
            verdict: &verdict,
        };
        let json = serde_json::to_string(&line)
            .map_err(|e| bitprobe_executor::HarnessError::Io(std::io::Error::other(e)))?;
        writeln!(out, "{json}").map_err(bitprobe_executor::HarnessError::Io)?;
    }
    tracing::info!(passed = summary.passed, faults = summary.faults, "replay complete");
    Ok(summary)
}

/// Run the backend health check for the configured target.
///
/// # Errors
/// Propagates [`bitprobe_executor::HarnessError::TargetNotFound`].
pub async fn check<B: TargetBackend, W: Write>(
    harness: &Harness<B>,
    out: &mut W,
) -> Result<(), CliError> {
    harness.health_check().await?;
    let program = harness.config().target.program.display().to_string();
    writeln!(out, "{}", serde_json::json!({ "target": program, "status": "ok" }))
        .map_err(bitprobe_executor::HarnessError::Io)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bitprobe_executor::{HarnessConfig, LocalProcessBackend, TargetConfig};

    use super::*;

    fn sh_harness(script: &str) -> Harness<LocalProcessBackend> {
        Harness::new(
            LocalProcessBackend::new(),
            HarnessConfig::new(TargetConfig::with_args(
                PathBuf::from("/bin/sh"),
                vec!["-c".to_owned(), script.to_owned(), "target".to_owned()],
            ))
            .with_read_timeout(Duration::from_secs(5)),
        )
    }

    #[test]
    fn load_inputs_decodes_bits_and_reads_files() {
        let dir = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("tempdir failed: {e}"),
        };
        let path = dir.path().join("crash-1");
        if let Err(e) = std::fs::write(&path, b"\x01\x02") {
            panic!("write failed: {e}");
        }

        let inputs = match load_inputs(Some("01000001\n"), &[path.clone()]) {
            Ok(i) => i,
            Err(e) => panic!("load failed: {e}"),
        };
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0], ReplayInput { label: "--bits".to_owned(), data: vec![0x41] });
        assert_eq!(inputs[1].data, vec![0x01, 0x02]);
        assert_eq!(inputs[1].label, path.display().to_string());
    }

    #[test]
    fn load_inputs_requires_something() {
        assert!(matches!(load_inputs(None, &[]), Err(CliError::NoInputs)));
    }

    #[test]
    fn load_inputs_rejects_bad_bits() {
        assert!(matches!(load_inputs(Some("0102"), &[]), Err(CliError::InvalidBits(_))));
    }

    #[tokio::test]
    async fn replay_prints_one_json_line_per_input() {
        let harness = sh_harness(r#"[ "$1" = "01000010" ] && echo "bad B" >&2; exit 0"#);
        let inputs = vec![
            ReplayInput { label: "a".to_owned(), data: b"A".to_vec() },
            ReplayInput { label: "b".to_owned(), data: b"B".to_vec() },
        ];
        let mut out = Vec::new();

        let summary = match replay(&harness, &inputs, &mut out).await {
            Ok(s) => s,
            Err(e) => panic!("replay failed: {e}"),
        };
        assert_eq!(summary, ReplaySummary { passed: 1, faults: 1 });
        assert_eq!(summary.exit_code(), 1);

        let text = String::from_utf8_lossy(&out);
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap_or(serde_json::Value::Null))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["input"], "a");
        assert_eq!(lines[0]["verdict"], "pass");
        assert_eq!(lines[1]["verdict"], "fault");
        assert_eq!(lines[1]["report"], "bad B");
        assert_eq!(lines[1]["input_len"], 1);
    }

    #[tokio::test]
    async fn check_reports_missing_target() {
        let harness = Harness::new(
            LocalProcessBackend::new(),
            HarnessConfig::new(TargetConfig::new(PathBuf::from("/nonexistent/bitprobe-target"))),
        );
        let mut out = Vec::new();
        let result = check(&harness, &mut out).await;
        assert!(matches!(result, Err(CliError::Harness(_))), "got {result:?}");
        assert!(out.is_empty());
    }
}
