//! Append-only content-addressed object store.
//!
//! Blobs are written by streaming bytes through a SHA-256 hasher to a
//! temporary file, then renaming that file to its content hash on success.
//! Blobs are never mutated after creation and never deleted by this crate
//! (garbage collection is out of scope — see the spec's Non-goals).

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod writer;

use std::path::{Path, PathBuf};

use forge_core::ObjectHash;
use tokio::fs::File;
use tokio::io::AsyncReadExt as _;

pub use error::StoreError;
pub use writer::Writer;

/// A single-directory, content-addressed blob repository on a local
/// filesystem. Each stored file is named by the 64-character lowercase hex
/// SHA-256 of its contents; no subdirectory sharding.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    /// Opens (creating if necessary) an object store rooted at `root`.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] if `root` cannot be created.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Begins a new scoped, hashing write. Call [`Writer::commit`] to finish.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] if the temp file cannot be created.
    pub async fn writer(&self) -> Result<Writer, StoreError> {
        Writer::create(&self.root).await
    }

    /// Writes `bytes` in one call and returns the resulting hash.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] on a filesystem failure.
    pub async fn write(&self, bytes: &[u8]) -> Result<ObjectHash, StoreError> {
        let mut writer = self.writer().await?;
        writer.write_all(bytes).await?;
        writer.commit().await
    }

    /// Opens a streaming reader for the blob named by `hash`.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no blob with that hash exists.
    pub async fn reader(&self, hash: &ObjectHash) -> Result<File, StoreError> {
        let path = self.blob_path(hash);
        File::open(&path).await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound { hash: hash.to_string() }
            } else {
                StoreError::Io(err)
            }
        })
    }

    /// Reads the full contents of the blob named by `hash`.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no blob with that hash exists.
    pub async fn read(&self, hash: &ObjectHash) -> Result<Vec<u8>, StoreError> {
        let mut reader = self.reader(hash).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Returns `true` if a blob named by `hash` exists on disk.
    ///
    /// Pure filesystem existence check: once `true`, never transitions back
    /// to `false` within this system (blobs are never deleted by this crate).
    pub async fn exists(&self, hash: &ObjectHash) -> bool {
        tokio::fs::try_exists(self.blob_path(hash)).await.unwrap_or(false)
    }

    fn blob_path(&self, hash: &ObjectHash) -> PathBuf {
        self.root.join(hash.as_str())
    }

    /// Returns the storage root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> (ObjectStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = ObjectStore::open(dir.path()).await.expect("open store");
        (store, dir)
    }

    #[tokio::test]
    async fn write_then_read_round_trips_bytes() {
        let (store, _dir) = temp_store().await;
        let hash = store.write(b"Hello, World!").await.expect("write");
        let bytes = store.read(&hash).await.expect("read");
        assert_eq!(bytes, b"Hello, World!");
    }

    #[tokio::test]
    async fn write_hash_matches_sha256() {
        let (store, _dir) = temp_store().await;
        let hash = store.write(b"Hello, World!").await.expect("write");
        assert_eq!(hash, ObjectHash::of(b"Hello, World!"));
    }

    #[tokio::test]
    async fn write_is_idempotent() {
        let (store, dir) = temp_store().await;
        let hash1 = store.write(b"same bytes").await.expect("first write");
        let hash2 = store.write(b"same bytes").await.expect("second write");
        assert_eq!(hash1, hash2);

        let entries = std::fs::read_dir(dir.path()).expect("read dir").count();
        assert_eq!(entries, 1, "writing identical bytes twice must leave exactly one blob");
    }

    #[tokio::test]
    async fn exists_is_false_before_write_and_true_after() {
        let (store, _dir) = temp_store().await;
        let hash = ObjectHash::of(b"not yet written");
        assert!(!store.exists(&hash).await);
        store.write(b"not yet written").await.expect("write");
        assert!(store.exists(&hash).await);
    }

    #[tokio::test]
    async fn read_missing_hash_returns_not_found() {
        let (store, _dir) = temp_store().await;
        let hash = ObjectHash::of(b"never written");
        let result = store.read(&hash).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn writer_dropped_without_commit_leaves_no_temp_file() {
        let (store, dir) = temp_store().await;
        {
            let mut writer = store.writer().await.expect("create writer");
            writer.write_all(b"partial").await.expect("write");
            // writer dropped here without calling commit()
        }
        let entries: Vec<_> = std::fs::read_dir(dir.path()).expect("read dir").collect();
        assert!(entries.is_empty(), "uncommitted writer must leave no file behind");
    }

    #[tokio::test]
    async fn writer_streaming_write_matches_single_call_write() {
        let (store, _dir) = temp_store().await;
        let mut writer = store.writer().await.expect("create writer");
        writer.write_all(b"Hello, ").await.expect("write chunk 1");
        writer.write_all(b"World!").await.expect("write chunk 2");
        let hash = writer.commit().await.expect("commit");
        assert_eq!(hash, ObjectHash::of(b"Hello, World!"));
    }
}
