//! XP log entry record and insert draft.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::Xp;

/// One logged unit of progress against a domain.
///
/// Entries are immutable once written; the only removal path is quest undo,
/// which deletes the most recent entry matching the quest's value tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpLogEntry {
    /// Activity domain the XP counts toward.
    pub domain: String,
    /// Free-text description of what was done.
    pub task: String,
    /// Points awarded.
    pub xp: Xp,
    /// Calendar day the entry was logged (day granularity).
    pub date: NaiveDate,
}

/// Insert payload used to create a new [`XpLogEntry`].
///
/// The entry date is supplied by the tracker (today, or an explicit date on
/// the `_on` variants), never by the caller-facing draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDraft {
    /// Activity domain the XP counts toward.
    pub domain: String,
    /// Free-text description of what was done.
    pub task: String,
    /// Points awarded.
    pub xp: Xp,
}
