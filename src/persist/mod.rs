//! Persistence abstraction over the three state documents.

/// JSON document store backed by a data directory.
pub mod json;
/// In-memory store for tests and benchmarks.
pub mod memory;

use thiserror::Error;

use crate::entry::XpLogEntry;
use crate::quest::Quest;
use crate::streak::StreakMap;

/// The three independent documents that make up tracker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocKind {
    /// The XP log entry array.
    Logs,
    /// The quest array.
    Quests,
    /// The domain-to-streak-record map.
    Streaks,
}

impl DocKind {
    /// On-disk file name for this document.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Logs => "log.json",
            Self::Quests => "quests.json",
            Self::Streaks => "streaks.json",
        }
    }
}

/// Failure while writing a state document.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying filesystem failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization failure.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Any other storage failure.
    #[error("{0}")]
    Message(String),
}

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Whole-document storage for tracker state.
///
/// Loads degrade to the empty collection when the document is absent,
/// unreadable, or unparsable; a dashboard should keep rendering on first run
/// or after corruption. Saves overwrite the entire document and propagate
/// failures to the caller.
pub trait StateStore: Send {
    /// Loads the full XP log, or an empty log.
    fn load_logs(&self) -> Vec<XpLogEntry>;
    /// Loads all quests, or an empty list.
    fn load_quests(&self) -> Vec<Quest>;
    /// Loads the streak map, or an empty map.
    fn load_streaks(&self) -> StreakMap;

    /// Overwrites the XP log document.
    fn save_logs(&mut self, logs: &[XpLogEntry]) -> StorageResult<()>;
    /// Overwrites the quests document.
    fn save_quests(&mut self, quests: &[Quest]) -> StorageResult<()>;
    /// Overwrites the streaks document.
    fn save_streaks(&mut self, streaks: &StreakMap) -> StorageResult<()>;
}
