use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use super::{KeyValueStore, StorageError};

/// One `<key>.json` file per key under a root directory.
///
/// Writes go to a temp file in the same directory and are renamed into place,
/// so a crash mid-write never leaves a truncated collection behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

fn write_atomically(root: &Path, target: &Path, value: &[u8]) -> std::io::Result<()> {
    std::fs::create_dir_all(root)?;
    let mut tmp = NamedTempFile::new_in(root)?;
    tmp.write_all(value)?;
    tmp.flush()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let root = self.root.clone();
        let target = self.path_for(key);
        tokio::task::spawn_blocking(move || write_atomically(&root, &target, &value))
            .await
            .map_err(std::io::Error::other)??;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.get("resumes").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_then_get_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set("resumes", b"[1,2]".to_vec()).await.unwrap();

        let reopened = FileStore::new(dir.path());
        assert_eq!(reopened.get("resumes").await.unwrap().as_deref(), Some(&b"[1,2]"[..]));
    }

    #[tokio::test]
    async fn test_non_utf8_file_is_returned_as_raw_bytes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("resumes.json"), b"[\xff\xfe garbage").unwrap();

        let store = FileStore::new(dir.path());
        let raw = store.get("resumes").await.unwrap().unwrap();
        assert_eq!(raw, b"[\xff\xfe garbage");
    }

    #[tokio::test]
    async fn test_set_creates_missing_root_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("data"));
        store.set("jobDescriptions", b"[]".to_vec()).await.unwrap();
        assert!(dir.path().join("nested/data/jobDescriptions.json").exists());
    }

    #[tokio::test]
    async fn test_remove_deletes_file_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set("analysisResults", b"[]".to_vec()).await.unwrap();
        store.remove("analysisResults").await.unwrap();
        store.remove("analysisResults").await.unwrap();
        assert!(!dir.path().join("analysisResults.json").exists());
    }
}
