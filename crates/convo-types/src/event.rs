use serde::{Deserialize, Serialize};

use crate::thread::{Role, StepReport};

/// Events emitted by the session controller.
/// The presentation layer subscribes to these instead of watching
/// store internals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A new thread was created and added to the store
    ThreadCreated { thread_id: String },

    /// A thread was marked active
    ThreadSelected { thread_id: String },

    /// A thread was removed from the store
    ThreadDeleted { thread_id: String },

    /// A message was appended to a thread
    MessageAppended { thread_id: String, role: Role },

    /// The backend replied; steps carry the extracted display fields
    AssistantReply {
        thread_id: String,
        steps: Vec<StepReport>,
    },

    /// The backend call failed; a synthetic assistant message was
    /// appended in its place
    TransportFailed { thread_id: String, detail: String },
}
