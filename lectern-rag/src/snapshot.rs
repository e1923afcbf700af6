//! Vector index with a persisted on-disk snapshot.
//!
//! [`SnapshotIndex`] wraps an [`InMemoryIndex`] and writes the full chunk
//! set to a JSON file in a snapshot directory on every rebuild. The file
//! records which embedding model produced the vectors, so a later process
//! can refuse to serve a snapshot that no longer matches the active model.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::index::VectorIndex;
use crate::inmemory::InMemoryIndex;

/// File name of the persisted snapshot inside the snapshot directory.
///
/// Its presence is the marker that a snapshot exists; see [`SnapshotIndex::exists`].
pub const SNAPSHOT_FILE: &str = "index.json";

const SNAPSHOT_TMP_FILE: &str = "index.json.tmp";
const SNAPSHOT_VERSION: u32 = 1;

/// On-disk snapshot layout: format version, embedding fingerprint, chunks.
#[derive(Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    model_id: String,
    dimensions: usize,
    created_at: DateTime<Utc>,
    chunks: Vec<Chunk>,
}

/// A [`VectorIndex`] that survives process restarts via a directory snapshot.
///
/// [`replace_all`](VectorIndex::replace_all) serializes the new corpus to a
/// temporary file and renames it over [`SNAPSHOT_FILE`], so an interrupted
/// build never leaves a partial snapshot. The in-memory state is swapped
/// only after the rename succeeds.
#[derive(Debug)]
pub struct SnapshotIndex {
    inner: InMemoryIndex,
    dir: PathBuf,
    model_id: String,
    dimensions: usize,
}

impl SnapshotIndex {
    /// Whether a persisted snapshot exists in the given directory.
    ///
    /// This is the single reload-or-build predicate: callers that find no
    /// snapshot fall back to a fresh build.
    pub fn exists(dir: &Path) -> bool {
        dir.join(SNAPSHOT_FILE).is_file()
    }

    /// Create an empty index that will persist to `dir`.
    ///
    /// `model_id` and `dimensions` identify the active embedding provider
    /// and are recorded in every snapshot this index writes.
    pub fn new(dir: impl Into<PathBuf>, model_id: impl Into<String>, dimensions: usize) -> Self {
        Self { inner: InMemoryIndex::new(), dir: dir.into(), model_id: model_id.into(), dimensions }
    }

    /// Load a persisted snapshot from `dir` without checking its fingerprint.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::SnapshotNotFound`] if no snapshot file exists,
    /// or [`RagError::IndexError`] if the file cannot be read or parsed.
    pub async fn load(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let file = read_snapshot(&dir).await?;

        let index = Self {
            inner: InMemoryIndex::new(),
            dir,
            model_id: file.model_id.clone(),
            dimensions: file.dimensions,
        };
        let chunk_count = file.chunks.len();
        index.inner.replace_all(file.chunks).await?;

        info!(
            dir = %index.dir.display(),
            model_id = %index.model_id,
            chunk_count,
            created_at = %file.created_at,
            "loaded index snapshot"
        );
        Ok(index)
    }

    /// Load a persisted snapshot and verify it matches the active embedding model.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::SnapshotMismatch`] if the snapshot was built
    /// with a different model or dimensionality, in addition to the errors
    /// of [`load`](SnapshotIndex::load).
    pub async fn open(dir: impl Into<PathBuf>, model_id: &str, dimensions: usize) -> Result<Self> {
        let loaded = Self::load(dir).await?;
        if loaded.model_id != model_id || loaded.dimensions != dimensions {
            return Err(RagError::SnapshotMismatch {
                snapshot_model: loaded.model_id,
                snapshot_dimensions: loaded.dimensions,
                active_model: model_id.to_string(),
                active_dimensions: dimensions,
            });
        }
        Ok(loaded)
    }

    /// The directory this index persists to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The embedding model identifier recorded in snapshots.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// The embedding dimensionality recorded in snapshots.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn snapshot_error(message: String) -> RagError {
    RagError::IndexError { backend: "Snapshot".to_string(), message }
}

async fn read_snapshot(dir: &Path) -> Result<SnapshotFile> {
    let path = dir.join(SNAPSHOT_FILE);
    if !path.is_file() {
        return Err(RagError::SnapshotNotFound { dir: dir.display().to_string() });
    }

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| snapshot_error(format!("failed to read '{}': {e}", path.display())))?;
    let file: SnapshotFile = serde_json::from_slice(&bytes)
        .map_err(|e| snapshot_error(format!("failed to parse '{}': {e}", path.display())))?;

    if file.version != SNAPSHOT_VERSION {
        return Err(snapshot_error(format!(
            "unsupported snapshot version {} in '{}'",
            file.version,
            path.display()
        )));
    }
    Ok(file)
}

#[async_trait]
impl VectorIndex for SnapshotIndex {
    async fn replace_all(&self, chunks: Vec<Chunk>) -> Result<()> {
        let file = SnapshotFile {
            version: SNAPSHOT_VERSION,
            model_id: self.model_id.clone(),
            dimensions: self.dimensions,
            created_at: Utc::now(),
            chunks,
        };
        let bytes = serde_json::to_vec(&file)
            .map_err(|e| snapshot_error(format!("failed to serialize snapshot: {e}")))?;

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            snapshot_error(format!("failed to create '{}': {e}", self.dir.display()))
        })?;

        let tmp = self.dir.join(SNAPSHOT_TMP_FILE);
        let path = self.dir.join(SNAPSHOT_FILE);
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| snapshot_error(format!("failed to write '{}': {e}", tmp.display())))?;
        // Rename within one directory is atomic: the marker file is either
        // the old complete snapshot or the new one, never a partial write.
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| snapshot_error(format!("failed to rename '{}': {e}", tmp.display())))?;

        let chunk_count = file.chunks.len();
        self.inner.replace_all(file.chunks).await?;

        info!(path = %path.display(), chunk_count, "persisted index snapshot");
        Ok(())
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        self.inner.search(embedding, top_k).await
    }

    async fn chunk_count(&self) -> usize {
        self.inner.chunk_count().await
    }
}
