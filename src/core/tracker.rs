use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::entry::{LogDraft, XpLogEntry};
use crate::persist::{StateStore, StorageError};
use crate::quest::{Quest, QuestDraft};
use crate::stats::{self, DomainStats};
use crate::streak::{self, StreakRecord};
use crate::types::QuestId;

/// Failure of a tracker operation.
///
/// The validation variants surface as a 4xx-equivalent at the caller;
/// `QuestNotFound` covers dangling ids, `AlreadyCompleted`/`NotCompleted`
/// are invalid state transitions, and `Storage` wraps write failures.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Domain was empty.
    #[error("domain must not be empty")]
    EmptyDomain,
    /// Log entry task text was empty.
    #[error("task must not be empty")]
    EmptyTask,
    /// Quest description was empty.
    #[error("description must not be empty")]
    EmptyDescription,
    /// XP was zero.
    #[error("xp must be greater than zero")]
    ZeroXp,
    /// No quest with the given id.
    #[error("quest not found: {0}")]
    QuestNotFound(QuestId),
    /// Quest is already completed.
    #[error("quest already completed: {0}")]
    AlreadyCompleted(QuestId),
    /// Quest has not been completed.
    #[error("quest is not completed: {0}")]
    NotCompleted(QuestId),
    /// Underlying document write failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result alias for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Log append and quest lifecycle over a [`StateStore`].
///
/// Every mutation loads the owning document in full, mutates it in memory,
/// and writes it back in full. The tracker itself provides no cross-caller
/// mutual exclusion; wrap it in the single-writer runtime
/// ([`crate::runtime::handle::spawn_tracker`]) when more than one caller can
/// mutate state.
pub struct Tracker<S: StateStore> {
    store: S,
    last_quest_id_ms: u64,
}

impl<S: StateStore> Tracker<S> {
    /// Creates a tracker over `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            last_quest_id_ms: 0,
        }
    }

    /// Appends an XP log entry dated today (UTC) and advances the domain
    /// streak. Returns the appended entry and the updated streak record.
    pub fn append_log(&mut self, draft: LogDraft) -> TrackerResult<(XpLogEntry, StreakRecord)> {
        self.append_log_on(draft, today_utc())
    }

    /// Appends an XP log entry with an explicit date.
    ///
    /// The streak document is updated and written before the log document.
    pub fn append_log_on(
        &mut self,
        draft: LogDraft,
        date: NaiveDate,
    ) -> TrackerResult<(XpLogEntry, StreakRecord)> {
        if draft.domain.is_empty() {
            return Err(TrackerError::EmptyDomain);
        }
        if draft.task.is_empty() {
            return Err(TrackerError::EmptyTask);
        }
        if draft.xp == 0 {
            return Err(TrackerError::ZeroXp);
        }

        let entry = XpLogEntry {
            domain: draft.domain,
            task: draft.task,
            xp: draft.xp,
            date,
        };

        let mut logs = self.store.load_logs();
        logs.push(entry.clone());

        let mut streaks = self.store.load_streaks();
        let record = streak::advance_domain(&mut streaks, &entry.domain, date);
        self.store.save_streaks(&streaks)?;
        self.store.save_logs(&logs)?;

        debug!(domain = %entry.domain, xp = entry.xp, "xp log appended");
        Ok((entry, record))
    }

    /// Creates a quest in the `(active, unarchived)` state.
    pub fn add_quest(&mut self, draft: QuestDraft) -> TrackerResult<Quest> {
        if draft.domain.is_empty() {
            return Err(TrackerError::EmptyDomain);
        }
        if draft.description.is_empty() {
            return Err(TrackerError::EmptyDescription);
        }
        if draft.xp == 0 {
            return Err(TrackerError::ZeroXp);
        }

        let quest = Quest {
            id: self.next_quest_id(),
            domain: draft.domain,
            description: draft.description,
            xp: draft.xp,
            completed: false,
            archived: false,
        };

        let mut quests = self.store.load_quests();
        quests.push(quest.clone());
        self.store.save_quests(&quests)?;

        debug!(id = %quest.id, domain = %quest.domain, "quest added");
        Ok(quest)
    }

    /// Completes a quest and logs its reward dated today (UTC).
    pub fn complete_quest(&mut self, id: &str) -> TrackerResult<(Quest, XpLogEntry)> {
        self.complete_quest_on(id, today_utc())
    }

    /// Completes a quest and logs its reward with an explicit date.
    ///
    /// Two-phase: the completed flag is persisted first, then the reward
    /// entry goes through the normal append path (streak update included).
    /// If the append fails, the flag flip is reverted so the quest does not
    /// stay completed without its XP.
    pub fn complete_quest_on(
        &mut self,
        id: &str,
        date: NaiveDate,
    ) -> TrackerResult<(Quest, XpLogEntry)> {
        let mut quests = self.store.load_quests();
        let idx = position_of(&quests, id)?;
        if quests[idx].completed {
            return Err(TrackerError::AlreadyCompleted(id.to_string()));
        }

        quests[idx].completed = true;
        self.store.save_quests(&quests)?;
        let quest = quests[idx].clone();

        let draft = LogDraft {
            domain: quest.domain.clone(),
            task: quest.description.clone(),
            xp: quest.xp,
        };
        match self.append_log_on(draft, date) {
            Ok((entry, _)) => {
                debug!(id = %quest.id, xp = quest.xp, "quest completed");
                Ok((quest, entry))
            }
            Err(err) => {
                // Compensating write: the reward was never logged, so the
                // quest must not stay completed.
                quests[idx].completed = false;
                if let Err(revert_err) = self.store.save_quests(&quests) {
                    warn!(id = %quest.id, %revert_err, "failed to revert completion flag");
                }
                Err(err)
            }
        }
    }

    /// Un-completes a quest and removes the most recent log entry matching
    /// the quest's `(domain, task, xp)` value tuple, if any.
    ///
    /// The match is by value, not by a foreign key, so a manual entry that
    /// happens to share the tuple can be the one removed. Streak records are
    /// not rewound.
    pub fn undo_quest(&mut self, id: &str) -> TrackerResult<Quest> {
        let mut quests = self.store.load_quests();
        let idx = position_of(&quests, id)?;
        if !quests[idx].completed {
            return Err(TrackerError::NotCompleted(id.to_string()));
        }

        quests[idx].completed = false;
        self.store.save_quests(&quests)?;
        let quest = quests[idx].clone();

        let mut logs = self.store.load_logs();
        let matched = logs.iter().rposition(|e| {
            e.domain == quest.domain && e.task == quest.description && e.xp == quest.xp
        });
        if let Some(pos) = matched {
            logs.remove(pos);
            self.store.save_logs(&logs)?;
        }

        debug!(id = %quest.id, removed_entry = matched.is_some(), "quest completion undone");
        Ok(quest)
    }

    /// Archives a quest. Idempotent; `completed` is untouched.
    pub fn archive_quest(&mut self, id: &str) -> TrackerResult<()> {
        self.set_archived(id, true)
    }

    /// Unarchives a quest. Idempotent; `completed` is untouched.
    pub fn unarchive_quest(&mut self, id: &str) -> TrackerResult<()> {
        self.set_archived(id, false)
    }

    /// Full XP log in insertion order.
    pub fn logs(&self) -> Vec<XpLogEntry> {
        self.store.load_logs()
    }

    /// All quests, archived included.
    pub fn quests(&self) -> Vec<Quest> {
        self.store.load_quests()
    }

    /// Log entries dated within the trailing `days`-day window ending today.
    pub fn recent_logs(&self, days: u64) -> Vec<XpLogEntry> {
        stats::recent_logs(&self.store.load_logs(), days, today_utc())
    }

    /// Per-domain stats derived from the log, with each domain's streak
    /// record attached when one exists.
    pub fn domain_stats(&self) -> Vec<DomainStats> {
        let streaks = self.store.load_streaks();
        let mut all = stats::domain_stats(&self.store.load_logs());
        for s in &mut all {
            s.streak = streaks.get(&s.domain).cloned();
        }
        all
    }

    /// Sorted, deduplicated union of domains from the log and quests.
    pub fn all_domains(&self) -> Vec<String> {
        stats::all_domains(&self.store.load_logs(), &self.store.load_quests())
    }

    /// Streak record for `domain`, if the domain has ever been logged.
    pub fn streak(&self, domain: &str) -> Option<StreakRecord> {
        self.store.load_streaks().get(domain).cloned()
    }

    fn set_archived(&mut self, id: &str, archived: bool) -> TrackerResult<()> {
        let mut quests = self.store.load_quests();
        let idx = position_of(&quests, id)?;
        quests[idx].archived = archived;
        self.store.save_quests(&quests)?;
        debug!(id, archived, "quest archive flag set");
        Ok(())
    }

    fn next_quest_id(&mut self) -> QuestId {
        let id = now_ms().max(self.last_quest_id_ms + 1);
        self.last_quest_id_ms = id;
        id.to_string()
    }
}

fn position_of(quests: &[Quest], id: &str) -> TrackerResult<usize> {
    quests
        .iter()
        .position(|q| q.id == id)
        .ok_or_else(|| TrackerError::QuestNotFound(id.to_string()))
}

fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
