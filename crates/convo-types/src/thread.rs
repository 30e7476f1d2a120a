use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single message in a conversation thread.
///
/// Messages are immutable once created; the role is fixed at
/// construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// RFC 3339 timestamp, stored as a string (wire format)
    pub timestamp: String,
    /// Agent work reported for this turn, in backend order
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub steps: Vec<Step>,
    /// Opaque tool-call payload passed through from the backend
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_calls: Option<Value>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            steps: Vec::new(),
            tool_calls: None,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            steps: Vec::new(),
            tool_calls: None,
        }
    }
}

/// One unit of agent work reported by the backend for a single
/// assistant turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    #[serde(rename = "type")]
    pub step_type: String,
    #[serde(rename = "rawId")]
    pub raw_id: String,
    /// Opaque serialized payload; not guaranteed to be parseable JSON
    #[serde(rename = "stepDetails")]
    pub step_details: String,
}

/// A persisted conversation thread.
///
/// The message log is append-only: earlier entries are never mutated
/// in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub messages: Vec<Message>,
}

impl Thread {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            messages: Vec::new(),
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Two-way classification of a step, with a fixed default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    ToolCall,
    MessageCreation,
}

impl StepKind {
    pub fn label(&self) -> &str {
        match self {
            StepKind::ToolCall => "Tool Call",
            StepKind::MessageCreation => "Message Creation",
        }
    }
}

/// Fields recovered from a step payload for display.
///
/// Derived on demand and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedStepFields {
    pub search_query: Option<String>,
    pub filter: Option<String>,
    /// In first-match order, duplicates preserved
    pub file_names: Vec<String>,
}

impl ExtractedStepFields {
    pub fn is_empty(&self) -> bool {
        self.search_query.is_none() && self.filter.is_none() && self.file_names.is_empty()
    }
}

/// Display decoration for one step: classification plus whatever
/// fields the extractor recovered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    pub kind: StepKind,
    pub fields: ExtractedStepFields,
}
