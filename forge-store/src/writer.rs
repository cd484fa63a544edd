//! Scoped, hashing writer for the object store.

use std::path::{Path, PathBuf};

use forge_core::ObjectHash;
use rand::Rng as _;
use sha2::{Digest, Sha256};
use tokio::fs::File;
use tokio::io::AsyncWriteExt as _;

use crate::error::StoreError;

/// A streaming writer that hashes bytes as they are written and commits them
/// to the store under their content hash on success.
///
/// Scoped: if the writer is dropped without [`Writer::commit`] being called
/// (the caller errored out before finishing), the temp file is unlinked on
/// drop so no partial blob is ever left behind.
pub struct Writer {
    root: PathBuf,
    temp_path: PathBuf,
    file: Option<File>,
    hasher: Sha256,
    committed: bool,
}

impl Writer {
    pub(crate) async fn create(root: &Path) -> Result<Self, StoreError> {
        let name = format!("tmp-{:016x}", rand::thread_rng().gen::<u64>());
        let temp_path = root.join(name);
        let file = File::create(&temp_path).await?;
        Ok(Self { root: root.to_owned(), temp_path, file: Some(file), hasher: Sha256::new(), committed: false })
    }

    /// Writes `bytes` to the temp file and feeds them into the hasher.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] on a filesystem write failure.
    pub async fn write_all(&mut self, bytes: &[u8]) -> Result<(), StoreError> {
        let file = self.file.as_mut().expect("write_all called after commit");
        file.write_all(bytes).await?;
        self.hasher.update(bytes);
        Ok(())
    }

    /// Finalizes the hash, flushes and closes the temp file, and renames it
    /// to its content-hash name.
    ///
    /// If a blob with the computed hash already exists, the temp file is
    /// discarded instead — the existing blob wins, per the store's
    /// immutability invariant.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] on a filesystem failure.
    pub async fn commit(mut self) -> Result<ObjectHash, StoreError> {
        let mut file = self.file.take().expect("commit called exactly once");
        file.flush().await?;
        drop(file);

        let digest = self.hasher.clone().finalize();
        let hex_digest = digest.iter().fold(String::with_capacity(64), |mut acc, byte| {
            use std::fmt::Write as _;
            let _ = write!(acc, "{byte:02x}");
            acc
        });
        let hash = ObjectHash::parse(hex_digest)?;
        let final_path = self.root.join(hash.as_str());

        if tokio::fs::try_exists(&final_path).await? {
            tokio::fs::remove_file(&self.temp_path).await?;
        } else {
            tokio::fs::rename(&self.temp_path, &final_path).await?;
        }

        self.committed = true;
        Ok(hash)
    }
}

impl Drop for Writer {
    fn drop(&mut self) {
        if !self.committed {
            // Best-effort synchronous cleanup; we cannot `.await` in `Drop`.
            // Writers that error before `commit` must never leave a temp file.
            let _ = std::fs::remove_file(&self.temp_path);
        }
    }
}
