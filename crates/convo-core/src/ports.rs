//! Port traits — the boundary between the engine and its collaborators.
//!
//! These traits are defined here in `convo-core` (pure Rust).
//! Storage implementations live in `convo-platform`; the transport
//! implementation is whatever backend client the application wires in.
//! The core never imports adapter code; it only depends on these traits.

use async_trait::async_trait;
use convo_types::{thread::Message, Result};

// ─── Chat Transport Port ─────────────────────────────────────

/// Backend round-trips for one conversation. Implementations are thin
/// fetch wrappers; retry and timeout policy belongs to them, not here.
#[async_trait(?Send)]
pub trait ChatPort {
    /// Send one user message and await the assistant payload
    /// (content plus any reported steps).
    async fn send_message(&self, text: &str, thread_id: &str) -> Result<Message>;

    /// Ask the backend to open a fresh thread; returns its id.
    async fn create_thread(&self) -> Result<String>;

    /// Fetch the message history of an existing backend thread.
    /// May fail; callers fall back to creating a new thread.
    async fn load_history(&self, thread_id: &str) -> Result<Vec<Message>>;
}

// ─── Storage Port ────────────────────────────────────────────

/// Durable string key-value storage (localStorage-shaped).
/// `set` must replace the value atomically: a reader sees either the
/// previous value or the new one, never a partial write.
#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a value, replacing any previous one
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value (no-op if absent)
    async fn remove(&self, key: &str) -> Result<()>;

    /// List keys with a given prefix
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Check if a key exists
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}
