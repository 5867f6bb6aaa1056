//! On-disk store for inputs that produced a fault.
//!
//! Each fault is written as two files sharing a stem:
//! `<stem>.bin` holds the raw input and `<stem>.json` the [`FaultRecord`].

use std::path::{Path, PathBuf};

use bitprobe_core::FaultRecord;

use crate::HarnessError;

/// Writes fault artifacts into a single directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Directory the store writes into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist `record` and the input it describes.
    ///
    /// Returns the path of the raw input file.
    ///
    /// # Errors
    /// Returns [`HarnessError::ArtifactWrite`] if the directory or either
    /// file cannot be written.
    pub async fn record(&self, record: &FaultRecord, data: &[u8]) -> Result<PathBuf, HarnessError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| HarnessError::ArtifactWrite { path: self.dir.clone(), source })?;

        let stem = record.artifact_stem();
        let input_path = self.dir.join(format!("{stem}.bin"));
        let record_path = self.dir.join(format!("{stem}.json"));

        let json = serde_json::to_vec_pretty(record).map_err(|e| HarnessError::ArtifactWrite {
            path: record_path.clone(),
            source: std::io::Error::other(e),
        })?;

        write_replacing(&input_path, data).await?;
        write_replacing(&record_path, &json).await?;

        tracing::info!(
            path = %input_path.display(),
            input_hash = %record.input_hash,
            "fault artifact written"
        );

        Ok(input_path)
    }
}

/// Write via a temporary sibling and rename, so readers never see a
/// partial file.
async fn write_replacing(path: &Path, contents: &[u8]) -> Result<(), HarnessError> {
    let tmp = path.with_extension("tmp");
    let wrap = |source| HarnessError::ArtifactWrite { path: path.to_owned(), source };
    tokio::fs::write(&tmp, contents).await.map_err(wrap)?;
    tokio::fs::rename(&tmp, path).await.map_err(wrap)?;
    Ok(())
}
