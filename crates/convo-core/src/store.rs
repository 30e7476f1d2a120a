//! Thread store — the in-memory thread collection, mirrored to
//! durable storage on every mutation.
//!
//! The whole collection is serialized and written after each change,
//! so the durable copy never lags the in-memory copy by more than one
//! mutation. Snapshots are taken while the collection borrow is held
//! and written after it is released: a concurrent reader observes
//! either the pre- or post-mutation state, never an interleaved one.

use std::cell::RefCell;
use std::rc::Rc;

use convo_types::{
    thread::{Message, Role, Thread},
    Result, SessionError,
};

use crate::ports::StoragePort;

/// Storage key holding the serialized thread collection.
pub const THREADS_KEY: &str = "convo.threads";
/// Storage key holding the active thread id.
pub const ACTIVE_THREAD_KEY: &str = "convo.activeThread";

/// Longest title derived from a thread's first message, in chars.
const TITLE_MAX_CHARS: usize = 48;
const DEFAULT_TITLE: &str = "New conversation";

pub struct ThreadStore {
    storage: Rc<dyn StoragePort>,
    /// Most-recently-created first
    threads: RefCell<Vec<Thread>>,
    /// Invariant: always references an id present in `threads`
    active: RefCell<Option<String>>,
    /// Active id recovered from storage that no local thread matches;
    /// the controller may hydrate it from backend history
    stale_active: RefCell<Option<String>>,
}

impl ThreadStore {
    /// Load the durable snapshot and build the store. Missing,
    /// unreadable or malformed prior state means an empty collection;
    /// nothing here fails the caller.
    pub async fn open(storage: Rc<dyn StoragePort>) -> Self {
        let threads = load_snapshot(storage.as_ref()).await;

        let saved_active = match storage.get(ACTIVE_THREAD_KEY).await {
            Ok(id) => id,
            Err(e) => {
                log::warn!("active thread id unreadable ({e}), ignoring");
                None
            }
        };
        let (active, stale_active) = match saved_active {
            Some(id) if threads.iter().any(|t| t.id == id) => (Some(id), None),
            Some(id) => (None, Some(id)),
            None => (None, None),
        };

        Self {
            storage,
            threads: RefCell::new(threads),
            active: RefCell::new(active),
            stale_active: RefCell::new(stale_active),
        }
    }

    // ─── Reads ───────────────────────────────────────────────

    /// All threads, most-recently-created first.
    pub fn list_threads(&self) -> Vec<Thread> {
        self.threads.borrow().clone()
    }

    pub fn thread(&self, thread_id: &str) -> Option<Thread> {
        self.threads
            .borrow()
            .iter()
            .find(|t| t.id == thread_id)
            .cloned()
    }

    pub fn active_id(&self) -> Option<String> {
        self.active.borrow().clone()
    }

    pub fn active_thread(&self) -> Option<Thread> {
        let active = self.active.borrow();
        active.as_deref().and_then(|id| self.thread(id))
    }

    /// A saved active id with no matching local thread, if the last
    /// snapshot load found one. Consumed by the caller.
    pub fn take_stale_active(&self) -> Option<String> {
        self.stale_active.borrow_mut().take()
    }

    // ─── Mutations ───────────────────────────────────────────

    /// Create a thread with a fresh local id, placed at the front of
    /// the list. The title is derived from the first user message.
    pub async fn create_thread(&self, initial_message: Option<&str>) -> Result<Thread> {
        let id = uuid::Uuid::new_v4().to_string();
        let thread = Thread::new(id, derive_title(initial_message));
        let snapshot = {
            let mut threads = self.threads.borrow_mut();
            threads.insert(0, thread.clone());
            serde_json::to_string(&*threads)?
        };
        self.persist(&snapshot).await?;
        Ok(thread)
    }

    /// Register a backend-issued thread id with pre-loaded history.
    /// Returns the existing record untouched if the id is already
    /// present (the local copy wins).
    pub async fn adopt_thread(&self, thread_id: &str, messages: Vec<Message>) -> Result<Thread> {
        if let Some(existing) = self.thread(thread_id) {
            return Ok(existing);
        }
        let first_user = messages
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str());
        let mut thread = Thread::new(thread_id, derive_title(first_user));
        thread.messages = messages;
        let snapshot = {
            let mut threads = self.threads.borrow_mut();
            threads.insert(0, thread.clone());
            serde_json::to_string(&*threads)?
        };
        self.persist(&snapshot).await?;
        Ok(thread)
    }

    /// Append a message to the end of a thread's log and persist the
    /// collection. Fails if the thread is absent.
    pub async fn append_message(&self, thread_id: &str, message: Message) -> Result<Thread> {
        let (updated, snapshot) = {
            let mut threads = self.threads.borrow_mut();
            let thread = threads
                .iter_mut()
                .find(|t| t.id == thread_id)
                .ok_or_else(|| SessionError::ThreadNotFound(thread_id.to_string()))?;
            thread.messages.push(message);
            (thread.clone(), serde_json::to_string(&*threads)?)
        };
        self.persist(&snapshot).await?;
        Ok(updated)
    }

    /// Remove a thread. No-op if absent. Clears the active reference
    /// when it pointed at the deleted thread.
    pub async fn delete_thread(&self, thread_id: &str) -> Result<()> {
        let snapshot = {
            let mut threads = self.threads.borrow_mut();
            let before = threads.len();
            threads.retain(|t| t.id != thread_id);
            if threads.len() == before {
                None
            } else {
                Some(serde_json::to_string(&*threads)?)
            }
        };
        let cleared = {
            let mut active = self.active.borrow_mut();
            if active.as_deref() == Some(thread_id) {
                *active = None;
                true
            } else {
                false
            }
        };
        if let Some(snapshot) = snapshot {
            self.persist(&snapshot).await?;
        }
        if cleared {
            self.storage.remove(ACTIVE_THREAD_KEY).await?;
        }
        Ok(())
    }

    /// Mark a thread active and persist the reference. Returns `None`
    /// without error when the id is absent.
    pub async fn select(&self, thread_id: &str) -> Result<Option<Thread>> {
        let Some(thread) = self.thread(thread_id) else {
            return Ok(None);
        };
        *self.active.borrow_mut() = Some(thread.id.clone());
        self.storage.set(ACTIVE_THREAD_KEY, &thread.id).await?;
        Ok(Some(thread))
    }

    async fn persist(&self, snapshot: &str) -> Result<()> {
        self.storage.set(THREADS_KEY, snapshot).await
    }
}

async fn load_snapshot(storage: &dyn StoragePort) -> Vec<Thread> {
    let raw = match storage.get(THREADS_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            log::warn!("thread snapshot unreadable ({e}), starting empty");
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(threads) => threads,
        Err(e) => {
            log::warn!("thread snapshot corrupt ({e}), starting empty");
            Vec::new()
        }
    }
}

fn derive_title(initial_message: Option<&str>) -> String {
    let text = initial_message.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    if text.chars().count() <= TITLE_MAX_CHARS {
        return text.to_string();
    }
    let mut title: String = text.chars().take(TITLE_MAX_CHARS).collect();
    title.push('…');
    title
}
