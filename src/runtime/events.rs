//! Runtime event stream payloads.

use crate::types::{QuestId, Xp};

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    /// An XP log entry was appended.
    LogAppended {
        /// Domain the entry counts toward.
        domain: String,
        /// Points awarded.
        xp: Xp,
    },
    /// A quest was created.
    QuestAdded {
        /// New quest id.
        id: QuestId,
    },
    /// A quest was completed and its reward logged.
    QuestCompleted {
        /// Completed quest id.
        id: QuestId,
    },
    /// A quest completion was undone.
    QuestUndone {
        /// Affected quest id.
        id: QuestId,
    },
    /// A quest was archived.
    QuestArchived {
        /// Affected quest id.
        id: QuestId,
    },
    /// A quest was unarchived.
    QuestUnarchived {
        /// Affected quest id.
        id: QuestId,
    },
}
