use chrono::NaiveDate;

use xplog::{
    core::tracker::{Tracker, TrackerError},
    entry::{LogDraft, XpLogEntry},
    persist::{StateStore, StorageError, StorageResult, memory::MemoryStore},
    quest::{Quest, QuestDraft},
    streak::StreakMap,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, d).expect("valid date")
}

fn quest_draft(domain: &str, description: &str, xp: u32) -> QuestDraft {
    QuestDraft {
        domain: domain.to_string(),
        description: description.to_string(),
        xp,
    }
}

#[test]
fn add_quest_validates_input() {
    let mut tracker = Tracker::new(MemoryStore::default());

    let err = tracker.add_quest(quest_draft("Fitness", "", 10)).unwrap_err();
    assert!(matches!(err, TrackerError::EmptyDescription));

    let err = tracker.add_quest(quest_draft("Fitness", "Run 5k", 0)).unwrap_err();
    assert!(matches!(err, TrackerError::ZeroXp));

    let err = tracker.add_quest(quest_draft("", "Run 5k", 10)).unwrap_err();
    assert!(matches!(err, TrackerError::EmptyDomain));

    assert!(tracker.quests().is_empty());
}

#[test]
fn append_log_validates_input() {
    let mut tracker = Tracker::new(MemoryStore::default());

    let err = tracker
        .append_log(LogDraft {
            domain: "Fitness".to_string(),
            task: "run".to_string(),
            xp: 0,
        })
        .unwrap_err();
    assert!(matches!(err, TrackerError::ZeroXp));

    let err = tracker
        .append_log(LogDraft {
            domain: "Fitness".to_string(),
            task: String::new(),
            xp: 5,
        })
        .unwrap_err();
    assert!(matches!(err, TrackerError::EmptyTask));

    assert!(tracker.logs().is_empty());
}

#[test]
fn new_quests_start_active_and_unarchived_with_unique_increasing_ids() {
    let mut tracker = Tracker::new(MemoryStore::default());
    let mut ids: Vec<u64> = Vec::new();

    for i in 0..5 {
        let quest = tracker
            .add_quest(quest_draft("Reading", &format!("chapter {i}"), 5))
            .expect("add quest");
        assert!(!quest.completed);
        assert!(!quest.archived);
        ids.push(quest.id.parse().expect("numeric id"));
    }

    for pair in ids.windows(2) {
        assert!(pair[1] > pair[0], "ids must be strictly increasing");
    }
}

#[test]
fn complete_appends_exactly_one_matching_entry() {
    let mut tracker = Tracker::new(MemoryStore::default());
    let quest = tracker
        .add_quest(quest_draft("Fitness", "Run 5k", 50))
        .expect("add quest");

    let (completed, entry) = tracker.complete_quest_on(&quest.id, day(1)).expect("complete");
    assert!(completed.completed);
    assert_eq!(entry.domain, "Fitness");
    assert_eq!(entry.task, "Run 5k");
    assert_eq!(entry.xp, 50);
    assert_eq!(entry.date, day(1));

    let logs = tracker.logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(tracker.streak("Fitness").expect("streak").current_streak, 1);
    assert!(tracker.quests()[0].completed);
}

#[test]
fn complete_twice_fails_without_second_entry() {
    let mut tracker = Tracker::new(MemoryStore::default());
    let quest = tracker
        .add_quest(quest_draft("Fitness", "Run 5k", 50))
        .expect("add quest");

    tracker.complete_quest_on(&quest.id, day(1)).expect("complete");
    let err = tracker.complete_quest_on(&quest.id, day(1)).unwrap_err();
    assert!(matches!(err, TrackerError::AlreadyCompleted(_)));
    assert_eq!(tracker.logs().len(), 1);
}

#[test]
fn complete_unknown_quest_fails() {
    let mut tracker = Tracker::new(MemoryStore::default());
    let err = tracker.complete_quest("1234").unwrap_err();
    assert!(matches!(err, TrackerError::QuestNotFound(_)));
}

#[test]
fn undo_restores_flag_and_removes_exactly_one_entry() {
    let mut tracker = Tracker::new(MemoryStore::default());
    let quest = tracker
        .add_quest(quest_draft("Fitness", "Run 5k", 50))
        .expect("add quest");

    tracker
        .append_log_on(
            LogDraft {
                domain: "Fitness".to_string(),
                task: "warmup".to_string(),
                xp: 10,
            },
            day(1),
        )
        .expect("append");
    let before = tracker.logs().len();

    tracker.complete_quest_on(&quest.id, day(1)).expect("complete");
    assert_eq!(tracker.logs().len(), before + 1);

    let undone = tracker.undo_quest(&quest.id).expect("undo");
    assert!(!undone.completed);
    assert_eq!(tracker.logs().len(), before);
    assert!(!tracker.quests()[0].completed);
}

#[test]
fn undo_removes_most_recent_matching_entry() {
    let mut tracker = Tracker::new(MemoryStore::default());
    let quest = tracker
        .add_quest(quest_draft("Fitness", "Run 5k", 50))
        .expect("add quest");

    // Manual entry sharing the quest's value tuple, logged earlier.
    tracker
        .append_log_on(
            LogDraft {
                domain: "Fitness".to_string(),
                task: "Run 5k".to_string(),
                xp: 50,
            },
            day(1),
        )
        .expect("append");
    tracker.complete_quest_on(&quest.id, day(2)).expect("complete");
    assert_eq!(tracker.logs().len(), 2);

    tracker.undo_quest(&quest.id).expect("undo");
    let logs = tracker.logs();
    assert_eq!(logs.len(), 1);
    // The completion entry (day 2) is the one removed.
    assert_eq!(logs[0].date, day(1));
}

#[test]
fn undo_of_uncompleted_quest_fails() {
    let mut tracker = Tracker::new(MemoryStore::default());
    let quest = tracker
        .add_quest(quest_draft("Fitness", "Run 5k", 50))
        .expect("add quest");

    let err = tracker.undo_quest(&quest.id).unwrap_err();
    assert!(matches!(err, TrackerError::NotCompleted(_)));
}

#[test]
fn archive_roundtrip_leaves_completed_untouched() {
    let mut tracker = Tracker::new(MemoryStore::default());
    let quest = tracker
        .add_quest(quest_draft("Fitness", "Run 5k", 50))
        .expect("add quest");
    tracker.complete_quest_on(&quest.id, day(1)).expect("complete");

    tracker.archive_quest(&quest.id).expect("archive");
    tracker.archive_quest(&quest.id).expect("archive is idempotent");
    let archived = &tracker.quests()[0];
    assert!(archived.archived);
    assert!(archived.completed, "completed and archived are independent");

    tracker.unarchive_quest(&quest.id).expect("unarchive");
    let unarchived = &tracker.quests()[0];
    assert!(!unarchived.archived);
    assert!(unarchived.completed);
}

#[test]
fn archive_unknown_quest_fails() {
    let mut tracker = Tracker::new(MemoryStore::default());
    let err = tracker.archive_quest("9999").unwrap_err();
    assert!(matches!(err, TrackerError::QuestNotFound(_)));
}

/// Store whose log saves always fail, for exercising the compensating write
/// in quest completion.
#[derive(Default)]
struct FailingLogStore {
    quests: Vec<Quest>,
    streaks: StreakMap,
}

impl StateStore for FailingLogStore {
    fn load_logs(&self) -> Vec<XpLogEntry> {
        Vec::new()
    }

    fn load_quests(&self) -> Vec<Quest> {
        self.quests.clone()
    }

    fn load_streaks(&self) -> StreakMap {
        self.streaks.clone()
    }

    fn save_logs(&mut self, _logs: &[XpLogEntry]) -> StorageResult<()> {
        Err(StorageError::Message("log document unavailable".to_string()))
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

#[test]
fn failed_reward_append_reverts_completion_flag() {
    let mut tracker = Tracker::new(FailingLogStore::default());
    let quest = tracker
        .add_quest(quest_draft("Fitness", "Run 5k", 50))
        .expect("add quest");

    let err = tracker.complete_quest_on(&quest.id, day(1)).unwrap_err();
    assert!(matches!(err, TrackerError::Storage(_)));

    let quests = tracker.quests();
    assert!(!quests[0].completed, "flag must be reverted when the reward is not logged");
}
