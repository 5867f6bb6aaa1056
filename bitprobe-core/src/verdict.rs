use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Status returned to the fuzzing engine when an input is accepted.
pub const STATUS_CONTINUE: i32 = 0;

/// Status returned to the fuzzing engine when an input revealed a fault.
pub const STATUS_FAULT: i32 = -1;

/// The outcome of evaluating one input against the target.
///
/// Infrastructure problems (the target could not be started, its output
/// could not be read) are not verdicts; they surface as errors from the
/// executor so they can never be mistaken for a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Verdict {
    /// The target wrote nothing to its error stream.
    Pass,
    /// The target wrote to its error stream.
    Fault {
        /// First line of error output, without its line terminator.
        report: String,
    },
    /// The target did not finish writing or close its error stream in time.
    TimedOut {
        /// The read timeout that elapsed.
        #[serde(with = "duration_ms")]
        after: Duration,
    },
}

impl Verdict {
    /// Returns `true` for any verdict other than [`Verdict::Pass`].
    #[must_use]
    pub fn is_fault(&self) -> bool {
        !matches!(self, Self::Pass)
    }

    /// Integer status following the fuzzing-engine callback convention.
    #[must_use]
    pub fn status(&self) -> i32 {
        if self.is_fault() {
            STATUS_FAULT
        } else {
            STATUS_CONTINUE
        }
    }

    /// Short lowercase label, also used as the artifact file prefix.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fault { .. } => "fault",
            Self::TimedOut { .. } => "timeout",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.write_str("pass"),
            Self::Fault { report } => write!(f, "fault: {report}"),
            Self::TimedOut { after } => write!(f, "timed out after {}ms", after.as_millis()),
        }
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_maps_to_continue_status() {
        assert_eq!(Verdict::Pass.status(), STATUS_CONTINUE);
        assert!(!Verdict::Pass.is_fault());
    }

    #[test]
    fn fault_and_timeout_map_to_fault_status() {
        let fault = Verdict::Fault { report: "boom".to_owned() };
        let timeout = Verdict::TimedOut { after: Duration::from_secs(1) };
        assert_eq!(fault.status(), STATUS_FAULT);
        assert_eq!(timeout.status(), STATUS_FAULT);
    }

    #[test]
    fn display_includes_report() {
        let fault = Verdict::Fault { report: "segmentation fault".to_owned() };
        assert_eq!(fault.to_string(), "fault: segmentation fault");
        let timeout = Verdict::TimedOut { after: Duration::from_millis(250) };
        assert_eq!(timeout.to_string(), "timed out after 250ms");
    }

    #[test]
    fn serializes_with_tag_and_millis() {
        let timeout = Verdict::TimedOut { after: Duration::from_millis(1500) };
        let json = match serde_json::to_string(&timeout) {
            Ok(j) => j,
            Err(e) => panic!("serialization failed: {e}"),
        };
        assert_eq!(json, r#"{"verdict":"timed_out","after":1500}"#);
    }
}
