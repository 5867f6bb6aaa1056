use std::time::Duration;

use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{ContentHash, FaultId};
use crate::verdict::Verdict;

/// A complete record of one input that made the target misbehave.
///
/// Fault records are immutable once created. They are written next to the
/// raw input so a finding can be replayed outside the fuzzing engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct FaultRecord {
    /// Unique identifier for this record.
    pub id: FaultId,
    /// SHA-256 hash of the raw input.
    pub input_hash: ContentHash,
    /// Length of the raw input in bytes.
    pub input_len: usize,
    /// Raw input, base64 encoded.
    pub input_base64: String,
    /// The verdict that produced this record; never [`Verdict::Pass`].
    pub verdict: Verdict,
    /// When the fault was observed.
    pub detected_at: DateTime<Utc>,
    /// Wall-clock duration of the target execution.
    pub duration: Duration,
}

impl FaultRecord {
    /// Create a record for `data`, or `None` if the verdict is a pass.
    ///
    /// # Arguments
    /// - `data`: the raw fuzz input
    /// - `verdict`: outcome of the execution
    /// - `detected_at`: wall-clock time of detection
    /// - `duration`: wall-clock elapsed time of the execution
    #[must_use]
    pub fn new(
        data: &[u8],
        verdict: Verdict,
        detected_at: DateTime<Utc>,
        duration: Duration,
    ) -> Option<Self> {
        if !verdict.is_fault() {
            return None;
        }
        Some(Self {
            id: FaultId::new(),
            input_hash: ContentHash::of(data),
            input_len: data.len(),
            input_base64: base64::engine::general_purpose::STANDARD.encode(data),
            verdict,
            detected_at,
            duration,
        })
    }

    /// File name stem for this record's artifacts: `<kind>-<input hash>`.
    ///
    /// Identical inputs map to the same stem, so re-discovering a fault
    /// overwrites rather than duplicates it.
    #[must_use]
    pub fn artifact_stem(&self) -> String {
        format!("{}-{}", self.verdict.kind(), self.input_hash)
    }
}
