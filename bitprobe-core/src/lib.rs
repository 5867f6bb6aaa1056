//! Core types for the bitprobe black-box fuzzing harness.
//!
//! Defines the input encoding, the target invocation built from one fuzz
//! input, verdicts, and the fault records persisted for later replay.
//! Nothing in this crate performs I/O.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod encoding;
pub mod error;
pub mod fault;
pub mod id;
pub mod invocation;
pub mod verdict;

pub use encoding::{decode_bits, encode_bits};
pub use error::CoreError;
pub use fault::FaultRecord;
pub use id::{ContentHash, FaultId};
pub use invocation::Invocation;
pub use verdict::{Verdict, STATUS_CONTINUE, STATUS_FAULT};

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;

    use super::*;

    #[test]
    fn content_hash_display_shows_hex() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xde;
        bytes[1] = 0xad;
        bytes[31] = 0xff;
        let hash = ContentHash::new(bytes);
        let s = hash.to_string();
        assert!(s.starts_with("dead"), "expected hex starting with 'dead', got {s}");
        assert!(s.ends_with("ff"), "expected hex ending with 'ff', got {s}");
        assert_eq!(s.len(), 64, "SHA-256 hex must be 64 chars");
    }

    #[test]
    fn content_hash_of_empty_is_sha256_of_empty() {
        assert_eq!(
            ContentHash::of(b"").to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn content_hash_as_bytes_returns_raw_bytes() {
        let bytes = [0xab_u8; 32];
        let hash = ContentHash::new(bytes);
        assert_eq!(hash.as_bytes(), &bytes, "as_bytes must return the original array");
    }

    #[test]
    fn fault_record_is_none_for_pass() {
        let record = FaultRecord::new(b"abc", Verdict::Pass, Utc::now(), Duration::ZERO);
        assert!(record.is_none(), "a passing input must not produce a fault record");
    }

    #[test]
    fn fault_record_new_sets_correct_fields() {
        let verdict = Verdict::Fault { report: "ERROR: bad input".to_owned() };
        let detected_at = Utc::now();
        let duration = Duration::from_millis(12);

        let Some(record) = FaultRecord::new(b"A", verdict.clone(), detected_at, duration) else {
            panic!("fault verdict must produce a record");
        };

        assert_eq!(record.input_hash, ContentHash::of(b"A"));
        assert_eq!(record.input_len, 1);
        assert_eq!(record.input_base64, "QQ==");
        assert_eq!(record.verdict, verdict);
        assert_eq!(record.detected_at, detected_at);
        assert_eq!(record.duration, duration);
    }

    #[test]
    fn artifact_stem_uses_kind_and_hash() {
        let Some(fault) = FaultRecord::new(
            b"x",
            Verdict::Fault { report: "e".to_owned() },
            Utc::now(),
            Duration::ZERO,
        ) else {
            panic!("expected record");
        };
        let Some(timeout) = FaultRecord::new(
            b"x",
            Verdict::TimedOut { after: Duration::from_secs(1) },
            Utc::now(),
            Duration::ZERO,
        ) else {
            panic!("expected record");
        };

        let hash = ContentHash::of(b"x");
        assert_eq!(fault.artifact_stem(), format!("fault-{hash}"));
        assert_eq!(timeout.artifact_stem(), format!("timeout-{hash}"));
        assert_ne!(fault.id, timeout.id, "each record gets its own id");
    }

    #[test]
    fn fault_record_json_round_trip_keeps_verdict() {
        let Some(record) = FaultRecord::new(
            &[0x00, 0xff],
            Verdict::Fault { report: "oops".to_owned() },
            Utc::now(),
            Duration::from_millis(3),
        ) else {
            panic!("expected record");
        };
        let json = match serde_json::to_string(&record) {
            Ok(j) => j,
            Err(e) => panic!("serialization failed: {e}"),
        };
        let back: FaultRecord = match serde_json::from_str(&json) {
            Ok(r) => r,
            Err(e) => panic!("deserialization failed: {e}"),
        };
        assert_eq!(back.verdict, record.verdict);
        assert_eq!(back.input_hash, record.input_hash);
    }
}
