//! Synchronous entry point for fuzzing engines.
//!
//! libFuzzer calls its target once per input on a plain thread and expects
//! an integer back. [`FuzzEntry`] owns a current-thread runtime, drives the
//! [`Harness`] to completion for each input, persists faults, and applies
//! the configured halting policy.

use std::path::{Path, PathBuf};
use std::time::Instant;

use bitprobe_core::{encode_bits, FaultRecord, Verdict, STATUS_CONTINUE, STATUS_FAULT};
use chrono::Utc;
use tokio::runtime::Runtime;

use crate::backend::TargetBackend;
use crate::{ArtifactStore, Harness, HarnessConfig, HarnessError, LocalProcessBackend};

/// Artifact directory used by [`FuzzEntry::from_env`] when none is configured.
pub const DEFAULT_ARTIFACT_DIR: &str = "bitprobe-artifacts";

/// Blocking, engine-facing wrapper around a [`Harness`].
pub struct FuzzEntry<B: TargetBackend = LocalProcessBackend> {
    runtime: Runtime,
    harness: Harness<B>,
    artifacts: Option<ArtifactStore>,
}

impl FuzzEntry<LocalProcessBackend> {
    /// Build an entry that runs targets as local processes.
    ///
    /// # Errors
    /// Returns [`HarnessError::Config`] if `config` is invalid and
    /// [`HarnessError::Runtime`] if the runtime cannot be created.
    pub fn new(config: HarnessConfig) -> Result<Self, HarnessError> {
        Self::with_backend(LocalProcessBackend::new(), config)
    }

    /// Build an entry from the `BITPROBE_*` environment.
    ///
    /// Faults are always persisted: without `BITPROBE_ARTIFACT_DIR` they go
    /// to [`DEFAULT_ARTIFACT_DIR`] under the working directory.
    ///
    /// # Errors
    /// See [`HarnessConfig::from_env`] and [`FuzzEntry::new`].
    pub fn from_env() -> Result<Self, HarnessError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`FuzzEntry::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    /// See [`HarnessConfig::from_lookup`] and [`FuzzEntry::new`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HarnessError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = HarnessConfig::from_lookup(lookup)?;
        if config.artifact_dir.is_none() {
            config.artifact_dir = Some(PathBuf::from(DEFAULT_ARTIFACT_DIR));
        }
        Self::new(config)
    }
}

impl<B: TargetBackend> FuzzEntry<B> {
    /// Build an entry around an arbitrary backend.
    ///
    /// # Errors
    /// Returns [`HarnessError::Config`] if `config` is invalid and
    /// [`HarnessError::Runtime`] if the runtime cannot be created.
    pub fn with_backend(backend: B, config: HarnessConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| HarnessError::Runtime(e.to_string()))?;
        let artifacts = config.artifact_dir.clone().map(ArtifactStore::new);
        Ok(Self { runtime, harness: Harness::new(backend, config), artifacts })
    }

    /// The wrapped harness.
    #[must_use]
    pub fn harness(&self) -> &Harness<B> {
        &self.harness
    }

    /// Directory faults are written to, if any.
    #[must_use]
    pub fn artifact_dir(&self) -> Option<&Path> {
        self.artifacts.as_ref().map(ArtifactStore::dir)
    }

    /// Evaluate one input, blocking until the target has been reaped.
    ///
    /// Faults are persisted to the artifact store when one is configured.
    ///
    /// # Errors
    /// Propagates infrastructure errors from [`Harness::evaluate`] and
    /// [`ArtifactStore::record`].
    pub fn evaluate(&self, data: &[u8]) -> Result<Verdict, HarnessError> {
        self.runtime.block_on(async {
            let started = Instant::now();
            let verdict = self.harness.evaluate(data).await?;
            if let Some(store) = &self.artifacts {
                let record = FaultRecord::new(data, verdict.clone(), Utc::now(), started.elapsed());
                if let Some(record) = record {
                    store.record(&record, data).await?;
                }
            }
            Ok(verdict)
        })
    }

    /// Engine callback: returns `0` to continue or `-1` for a finding.
    ///
    /// # Panics
    /// Panics after recording a fault when `halt_on_fault` is set, and on an
    /// infrastructure error when `halt_on_infra_error` is set. The panic is
    /// how libFuzzer is told to stop and keep the input.
    #[must_use]
    pub fn test_one_input(&self, data: &[u8]) -> i32 {
        let config = self.harness.config();
        match self.evaluate(data) {
            Ok(Verdict::Pass) => STATUS_CONTINUE,
            Ok(verdict) => {
                tracing::error!(input_bits = %encode_bits(data), %verdict, "target fault");
                if config.halt_on_fault {
                    panic!("target fault: {verdict}");
                }
                STATUS_FAULT
            }
            Err(e) => {
                tracing::error!(error = %e, "harness infrastructure error");
                if config.halt_on_infra_error {
                    panic!("harness infrastructure error: {e}");
                }
                STATUS_FAULT
            }
        }
    }
}
