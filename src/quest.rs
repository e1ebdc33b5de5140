//! Quest record and insert draft.

use serde::{Deserialize, Serialize};

use crate::types::{QuestId, Xp};

/// A user-defined task with a fixed XP reward.
///
/// `completed` and `archived` are independent flags: a quest may be both
/// completed and archived. Quests are mutated in place for flag transitions
/// and never physically deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    /// Stable quest identifier, assigned at creation.
    pub id: QuestId,
    /// Activity domain the reward counts toward.
    pub domain: String,
    /// What must be done to earn the reward.
    pub description: String,
    /// XP awarded on completion.
    pub xp: Xp,
    /// True once the quest has been completed.
    pub completed: bool,
    /// True while the quest is hidden from the active list.
    ///
    /// Defaults to false when the key is absent, so documents written by
    /// older tools that omitted the field decode unambiguously.
    #[serde(default)]
    pub archived: bool,
}

/// Insert payload used to create a new [`Quest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestDraft {
    /// Activity domain the reward counts toward.
    pub domain: String,
    /// What must be done to earn the reward.
    pub description: String,
    /// XP awarded on completion.
    pub xp: Xp,
}
