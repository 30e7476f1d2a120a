//! Session controller — orchestrates thread lifecycle, message
//! submission and backend round-trips, merging results into the
//! thread store.
//!
//! A submission always leaves its thread in a renderable state: the
//! transport outcome, success or failure, becomes an assistant
//! message. Transport errors never escape this boundary; only
//! user-caused failures (empty input, unknown thread) do.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::lock::Mutex;

use convo_types::{
    event::SessionEvent,
    thread::{Message, Role, Thread},
    Result, SessionError,
};

use crate::event_bus::EventBus;
use crate::ports::ChatPort;
use crate::steps::step_reports;
use crate::store::ThreadStore;

/// Fixed user-visible reply substituted when the backend call fails.
pub const TRANSPORT_ERROR_REPLY: &str =
    "Sorry, I encountered an error processing your request.";

pub struct SessionController {
    store: ThreadStore,
    chat: Rc<dyn ChatPort>,
    events: EventBus,
    /// One gate per thread id. A submission holds its thread's gate
    /// for the whole exchange, so same-thread submissions append in
    /// call order while other threads proceed independently.
    gates: RefCell<HashMap<String, Rc<Mutex<()>>>>,
}

impl SessionController {
    pub fn new(store: ThreadStore, chat: Rc<dyn ChatPort>, events: EventBus) -> Self {
        Self {
            store,
            chat,
            events,
            gates: RefCell::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &ThreadStore {
        &self.store
    }

    /// Create a fresh thread, select it, and run one exchange.
    /// Rejected before any side effect when the text trims empty.
    pub async fn submit_to_new_thread(&self, text: &str) -> Result<Thread> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyInput);
        }
        let thread = self.store.create_thread(Some(text)).await?;
        self.events.emit(SessionEvent::ThreadCreated {
            thread_id: thread.id.clone(),
        });
        self.store.select(&thread.id).await?;
        self.events.emit(SessionEvent::ThreadSelected {
            thread_id: thread.id.clone(),
        });
        self.run_exchange(&thread.id, text).await
    }

    /// Run one exchange against an existing thread. Fails with
    /// `ThreadNotFound` when the id is absent at call time.
    pub async fn submit_to_existing_thread(&self, thread_id: &str, text: &str) -> Result<Thread> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyInput);
        }
        if self.store.thread(thread_id).is_none() {
            return Err(SessionError::ThreadNotFound(thread_id.to_string()));
        }
        self.run_exchange(thread_id, text).await
    }

    /// Mark a thread active. Returns `None` (no error) if absent.
    pub async fn select_thread(&self, thread_id: &str) -> Option<Thread> {
        match self.store.select(thread_id).await {
            Ok(Some(thread)) => {
                self.events.emit(SessionEvent::ThreadSelected {
                    thread_id: thread.id.clone(),
                });
                Some(thread)
            }
            Ok(None) => None,
            Err(e) => {
                // Selection took effect in memory; only the mirror write failed.
                log::warn!("failed to persist thread selection: {e}");
                self.store.thread(thread_id)
            }
        }
    }

    pub async fn delete_thread(&self, thread_id: &str) -> Result<()> {
        self.store.delete_thread(thread_id).await?;
        self.gates.borrow_mut().remove(thread_id);
        self.events.emit(SessionEvent::ThreadDeleted {
            thread_id: thread_id.to_string(),
        });
        Ok(())
    }

    /// Startup path: reuse the active thread if the snapshot has one;
    /// hydrate a dangling saved id from backend history; otherwise
    /// open a fresh thread, preferring a backend-issued id.
    pub async fn resume_or_create(&self) -> Result<Thread> {
        if let Some(thread) = self.store.active_thread() {
            return Ok(thread);
        }

        if let Some(id) = self.store.take_stale_active() {
            match self.chat.load_history(&id).await {
                Ok(messages) => {
                    let thread = self.store.adopt_thread(&id, messages).await?;
                    self.store.select(&thread.id).await?;
                    self.events.emit(SessionEvent::ThreadSelected {
                        thread_id: thread.id.clone(),
                    });
                    return Ok(thread);
                }
                Err(e) => {
                    log::warn!("history for saved thread {id} unavailable ({e}), starting fresh");
                }
            }
        }

        let thread = match self.chat.create_thread().await {
            Ok(id) => self.store.adopt_thread(&id, Vec::new()).await?,
            Err(e) => {
                log::warn!("backend thread creation failed ({e}), using a local id");
                self.store.create_thread(None).await?
            }
        };
        self.events.emit(SessionEvent::ThreadCreated {
            thread_id: thread.id.clone(),
        });
        self.store.select(&thread.id).await?;
        self.events.emit(SessionEvent::ThreadSelected {
            thread_id: thread.id.clone(),
        });
        Ok(thread)
    }

    /// One user turn: append the user message, call the backend, and
    /// append the reply (or the synthetic error reply) in its place.
    async fn run_exchange(&self, thread_id: &str, text: &str) -> Result<Thread> {
        let gate = self.gate(thread_id);
        let _turn = gate.lock().await;

        self.store
            .append_message(thread_id, Message::user(text))
            .await?;
        self.events.emit(SessionEvent::MessageAppended {
            thread_id: thread_id.to_string(),
            role: Role::User,
        });

        let reply = match self.chat.send_message(text, thread_id).await {
            Ok(reply) => {
                self.events.emit(SessionEvent::AssistantReply {
                    thread_id: thread_id.to_string(),
                    steps: step_reports(&reply.steps),
                });
                reply
            }
            Err(e) => {
                log::warn!("transport failure on thread {thread_id}: {e}");
                self.events.emit(SessionEvent::TransportFailed {
                    thread_id: thread_id.to_string(),
                    detail: e.to_string(),
                });
                Message::assistant(TRANSPORT_ERROR_REPLY)
            }
        };

        let role = reply.role;
        let thread = self.store.append_message(thread_id, reply).await?;
        self.events.emit(SessionEvent::MessageAppended {
            thread_id: thread_id.to_string(),
            role,
        });
        Ok(thread)
    }

    fn gate(&self, thread_id: &str) -> Rc<Mutex<()>> {
        self.gates
            .borrow_mut()
            .entry(thread_id.to_string())
            .or_insert_with(|| Rc::new(Mutex::new(())))
            .clone()
    }
}
