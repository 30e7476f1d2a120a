//! File-backed storage — one file per key under a root directory.
//!
//! Writes go to a temp file followed by a rename, so a value is
//! replaced atomically: a crash mid-write leaves the previous
//! consistent snapshot on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use convo_core::ports::StoragePort;
use convo_types::{Result, SessionError};

const FILE_SUFFIX: &str = ".kv";

pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open a storage root, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| storage_err("create root", &root, e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}{}", sanitize_key(key), FILE_SUFFIX))
    }
}

#[async_trait(?Send)]
impl StoragePort for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_err("read", &path, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value).map_err(|e| storage_err("write", &tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| storage_err("replace", &path, e))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_err("remove", &path, e)),
        }
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| storage_err("list", &self.root, e))?;
        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| storage_err("list", &self.root, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(key) = name.strip_suffix(FILE_SUFFIX) {
                if key.starts_with(prefix) {
                    keys.push(key.to_string());
                }
            }
        }
        Ok(keys)
    }

    fn backend_name(&self) -> &str {
        "file"
    }
}

/// Keys are expected to be dot-separated identifiers; anything else
/// is flattened so it cannot escape the root directory.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn storage_err(op: &str, path: &Path, e: io::Error) -> SessionError {
    SessionError::Storage(format!("{} {}: {}", op, path.display(), e))
}
