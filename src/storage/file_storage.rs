use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{error, info};

use crate::error_handling::types::StorageError;
use crate::storage::storage_trait::CaptureStorage;

/// Append-only capture log on the local filesystem.
pub struct FileStorage {
    path: PathBuf,
    file: File,
}

impl FileStorage {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                error!("Failed to open capture log {}: {}", path.display(), e);
                StorageError::CreateFailed
            })?;
        info!("FileStorage appending to {}", path.display());
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CaptureStorage for FileStorage {
    fn append_text(&mut self, text: &str) -> Result<(), StorageError> {
        self.file.write_all(text.as_bytes()).map_err(|e| {
            error!("Write failed {}: {}", self.path.display(), e);
            StorageError::WriteFailed
        })?;
        // Flushed per record so a tap killed mid-session leaves a usable log.
        self.file.flush().map_err(|e| {
            error!("Flush failed {}: {}", self.path.display(), e);
            StorageError::WriteFailed
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_accumulate_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("capture.log");

        let mut storage = FileStorage::create(&path).expect("create");
        storage.append_text("[OUTGOING] first\n").expect("append");
        storage.append_text("[INCOMING] second\n").expect("append");
        drop(storage);

        let content = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(content, "[OUTGOING] first\n[INCOMING] second\n");
    }

    #[test]
    fn reopening_appends_instead_of_truncating() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("capture.log");

        FileStorage::create(&path)
            .expect("create")
            .append_text("one\n")
            .expect("append");
        FileStorage::create(&path)
            .expect("reopen")
            .append_text("two\n")
            .expect("append");

        let content = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(content, "one\ntwo\n");
    }

    #[test]
    fn create_fails_on_unwritable_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing-subdir").join("capture.log");
        assert!(matches!(
            FileStorage::create(&path),
            Err(StorageError::CreateFailed)
        ));
    }
}
