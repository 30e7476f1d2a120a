//! Pick the best available storage backend.
//!
//! Priority: file-backed (durable) → memory (fallback).

use std::path::PathBuf;
use std::rc::Rc;

use convo_core::ports::StoragePort;

use super::{FileStorage, MemoryStorage};

/// Open the best available storage backend for the given root.
/// Returns a trait object so callers are backend-agnostic.
pub fn pick_storage(root: Option<PathBuf>) -> Rc<dyn StoragePort> {
    if let Some(root) = root {
        match FileStorage::open(&root) {
            Ok(file) => {
                log::info!("storage backend: file ({})", root.display());
                return Rc::new(file);
            }
            Err(e) => {
                log::warn!("file storage unavailable ({e}), falling back to memory");
            }
        }
    }
    log::info!("storage backend: memory");
    Rc::new(MemoryStorage::new())
}
