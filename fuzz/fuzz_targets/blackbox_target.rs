//! Fuzz target: black-box execution of an external program.
//!
//! Every input is encoded as a bit string and passed as the last argument
//! to the program named by `BITPROBE_TARGET` (or the config file named by
//! `BITPROBE_CONFIG`). Output on the target's stderr is a finding.
//!
//! Findings are logged at error level with their bit string and written to
//! `BITPROBE_ARTIFACT_DIR` (default `bitprobe-artifacts`), and the run
//! continues; set `BITPROBE_HALT_ON_FAULT=1` to stop at the first one.
//! Logging defaults to `info` unless `RUST_LOG` says otherwise.
#![no_main]

use std::sync::OnceLock;

use bitprobe_core::STATUS_CONTINUE;
use bitprobe_executor::FuzzEntry;
use libfuzzer_sys::{fuzz_target, Corpus};
use tracing_subscriber::EnvFilter;

static ENTRY: OnceLock<FuzzEntry> = OnceLock::new();

fn entry() -> &'static FuzzEntry {
    ENTRY.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .try_init();
        FuzzEntry::from_env().unwrap_or_else(|e| panic!("bitprobe harness setup failed: {e}"))
    })
}

fuzz_target!(|data: &[u8]| -> Corpus {
    if entry().test_one_input(data) == STATUS_CONTINUE {
        Corpus::Keep
    } else {
        // Faulting inputs are recorded by the harness; keep them out of the
        // corpus so mutation does not keep rediscovering the same finding.
        Corpus::Reject
    }
});
