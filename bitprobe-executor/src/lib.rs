//! Target execution for the bitprobe black-box fuzzing harness.
//!
//! Runs an external executable once per fuzz input, with the input encoded
//! as a bit string argument, and reports a fault whenever the executable
//! writes to its error stream.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod artifact;
pub mod backend;
pub mod config;
pub mod entry;
pub mod error;
pub mod harness;
pub mod process;

pub use artifact::ArtifactStore;
pub use backend::{Capture, CaptureLimits, TargetBackend};
pub use config::{HarnessConfig, TargetConfig};
pub use entry::{FuzzEntry, DEFAULT_ARTIFACT_DIR};
pub use error::HarnessError;
pub use harness::{Harness, HarnessStats};
pub use process::LocalProcessBackend;
