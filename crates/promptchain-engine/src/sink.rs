//! Artifact persistence
//!
//! The chain decides *what* becomes the artifact; the sink decides where
//! and how it is stored. `FileSink` writes atomically into an output
//! directory with overwrite-on-conflict semantics.

use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Mutex;
use tracing::info;

use crate::outcome::Artifact;
use promptchain_utils::atomic_write::write_file_atomic;
use promptchain_utils::error::SinkError;

/// Destination for a chain's final artifact.
pub trait ArtifactSink: Send + Sync {
    /// Persist the artifact, returning where it landed.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` if the destination is unwritable. Never retried
    /// automatically.
    fn store(&self, artifact: &Artifact) -> Result<Utf8PathBuf, SinkError>;
}

/// Sink writing artifacts into a directory on disk.
pub struct FileSink {
    output_dir: Utf8PathBuf,
}

impl FileSink {
    /// Create a sink rooted at `output_dir`. The directory is created on
    /// first store.
    #[must_use]
    pub fn new(output_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl ArtifactSink for FileSink {
    fn store(&self, artifact: &Artifact) -> Result<Utf8PathBuf, SinkError> {
        let destination = self.output_dir.join(Utf8Path::new(&artifact.name));

        write_file_atomic(&destination, &artifact.text).map_err(|e| SinkError::Write {
            destination: destination.to_string(),
            source: e,
        })?;

        info!(path = %destination, bytes = artifact.text.len(), "Artifact stored");
        Ok(destination)
    }
}

/// In-memory sink for tests.
#[derive(Default)]
pub struct MemorySink {
    stored: Mutex<Vec<Artifact>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifacts stored so far, in order.
    #[must_use]
    pub fn artifacts(&self) -> Vec<Artifact> {
        self.stored.lock().expect("sink lock poisoned").clone()
    }
}

impl ArtifactSink for MemorySink {
    fn store(&self, artifact: &Artifact) -> Result<Utf8PathBuf, SinkError> {
        self.stored
            .lock()
            .expect("sink lock poisoned")
            .push(artifact.clone());
        Ok(Utf8PathBuf::from(format!("memory://{}", artifact.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sink_stores_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let sink = FileSink::new(root.join("out"));

        let artifact = Artifact::new("chain.md", "# result\n");
        let path = sink.store(&artifact).unwrap();

        assert_eq!(path, root.join("out").join("chain.md"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# result\n");
    }

    #[test]
    fn test_file_sink_overwrites_on_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let sink = FileSink::new(root.clone());

        sink.store(&Artifact::new("chain.md", "first")).unwrap();
        let path = sink.store(&Artifact::new("chain.md", "second")).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_file_sink_unwritable_destination_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();

        // A regular file where the output directory should be
        let blocker = root.join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let sink = FileSink::new(blocker);
        let err = sink
            .store(&Artifact::new("chain.md", "content"))
            .unwrap_err();

        let SinkError::Write { destination, .. } = err;
        assert!(destination.ends_with("blocker/chain.md"));
    }

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.store(&Artifact::new("a.md", "one")).unwrap();
        sink.store(&Artifact::new("b.md", "two")).unwrap();

        let stored = sink.artifacts();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].name, "a.md");
        assert_eq!(stored[1].text, "two");
    }
}
