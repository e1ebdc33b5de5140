//! In-memory [`StateStore`] used by tests and benchmarks.

use crate::entry::XpLogEntry;
use crate::quest::Quest;
use crate::streak::StreakMap;

use super::{StateStore, StorageResult};

/// Store that keeps all three documents in memory. Loads clone, saves
/// replace. Never fails.
#[derive(Debug, Default)]
pub struct MemoryStore {
    logs: Vec<XpLogEntry>,
    quests: Vec<Quest>,
    streaks: StreakMap,
}

impl StateStore for MemoryStore {
    fn load_logs(&self) -> Vec<XpLogEntry> {
        self.logs.clone()
    }

    fn load_quests(&self) -> Vec<Quest> {
        self.quests.clone()
    }

    fn load_streaks(&self) -> StreakMap {
        self.streaks.clone()
    }

    fn save_logs(&mut self, logs: &[XpLogEntry]) -> StorageResult<()> {
        self.logs = logs.to_vec();
        Ok(())
    }

    fn save_quests(&mut self, quests: &[Quest]) -> StorageResult<()> {
        self.quests = quests.to_vec();
        Ok(())
    }

    fn save_streaks(&mut self, streaks: &StreakMap) -> StorageResult<()> {
        self.streaks = streaks.clone();
        Ok(())
    }
}
