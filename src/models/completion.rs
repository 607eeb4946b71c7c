use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An entry in the "got done" ledger.
///
/// Written whenever a to-do or subtask is marked done. The entry carries a
/// snapshot of the item's title and category name at marking time, so it
/// survives later edits and deletes of the source item. Entries are never
/// updated and never deleted individually — only the whole ledger can be
/// cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    pub id: Uuid,
    /// Title of the item at the moment it was marked done.
    pub title: String,
    /// Name of the owning category at the moment it was marked done.
    pub category: String,
    pub kind: CompletionKind,
    pub completed_at: DateTime<Utc>,
}

/// Which kind of item produced a completion entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompletionKind {
    Todo,
    Subtask,
}

impl CompletionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Subtask => "subtask",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(Self::Todo),
            "subtask" => Some(Self::Subtask),
            _ => None,
        }
    }
}
