use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, broadcast, mpsc, oneshot};

use crate::core::tracker::{Tracker, TrackerError};
use crate::entry::{LogDraft, XpLogEntry};
use crate::persist::StateStore;
use crate::quest::{Quest, QuestDraft};
use crate::stats::DomainStats;
use crate::streak::StreakRecord;
use crate::types::QuestId;

use super::events::TrackerEvent;

/// Failure of a runtime request.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The tracker rejected or failed the operation.
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    /// The runtime loop is gone.
    #[error("runtime channel closed")]
    ChannelClosed,
}

/// Runtime tuning knobs.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Bound of the command queue feeding the writer loop.
    pub cmd_queue_bound: usize,
    /// Capacity of the broadcast event channel.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            cmd_queue_bound: 256,
            event_capacity: 1024,
        }
    }
}

/// Cloneable handle to the single-writer tracker loop.
///
/// All mutations funnel through one task, so the read-modify-write sequence
/// of each operation is atomic with respect to every other caller.
pub struct TrackerHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<TrackerEvent>,
}

impl Clone for TrackerHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    AppendLog {
        draft: LogDraft,
        resp: oneshot::Sender<Result<(XpLogEntry, StreakRecord), RuntimeError>>,
    },
    AddQuest {
        draft: QuestDraft,
        resp: oneshot::Sender<Result<Quest, RuntimeError>>,
    },
    CompleteQuest {
        id: QuestId,
        resp: oneshot::Sender<Result<(Quest, XpLogEntry), RuntimeError>>,
    },
    UndoQuest {
        id: QuestId,
        resp: oneshot::Sender<Result<Quest, RuntimeError>>,
    },
    ArchiveQuest {
        id: QuestId,
        archived: bool,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    Logs {
        resp: oneshot::Sender<Vec<XpLogEntry>>,
    },
    RecentLogs {
        days: u64,
        resp: oneshot::Sender<Vec<XpLogEntry>>,
    },
    Quests {
        resp: oneshot::Sender<Vec<Quest>>,
    },
    DomainStats {
        resp: oneshot::Sender<Vec<DomainStats>>,
    },
    AllDomains {
        resp: oneshot::Sender<Vec<String>>,
    },
    Streak {
        domain: String,
        resp: oneshot::Sender<Option<StreakRecord>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Spawns the single-writer loop and returns its handle.
pub fn spawn_tracker<S>(tracker: Tracker<S>, config: RuntimeConfig) -> TrackerHandle
where
    S: StateStore + 'static,
{
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.cmd_queue_bound);
    let (events_tx, _) = broadcast::channel::<TrackerEvent>(config.event_capacity);

    let events_tx_loop = events_tx.clone();
    let tracker = Arc::new(Mutex::new(tracker));

    tokio::spawn(async move {
        loop {
            let Some(cmd) = cmd_rx.recv().await else { break };
            let done = handle_command(cmd, &tracker, &events_tx_loop).await;
            if done {
                break;
            }
        }
    });

    TrackerHandle { cmd_tx, events_tx }
}

impl TrackerHandle {
    /// Subscribes to the runtime event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.events_tx.subscribe()
    }

    /// Appends an XP log entry dated today.
    pub async fn append_log(
        &self,
        draft: LogDraft,
    ) -> Result<(XpLogEntry, StreakRecord), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::AppendLog { draft, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Creates a quest.
    pub async fn add_quest(&self, draft: QuestDraft) -> Result<Quest, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::AddQuest { draft, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Completes a quest and logs its reward.
    pub async fn complete_quest(
        &self,
        id: impl Into<QuestId>,
    ) -> Result<(Quest, XpLogEntry), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::CompleteQuest {
                id: id.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Undoes a quest completion.
    pub async fn undo_quest(&self, id: impl Into<QuestId>) -> Result<Quest, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::UndoQuest {
                id: id.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Archives a quest.
    pub async fn archive_quest(&self, id: impl Into<QuestId>) -> Result<(), RuntimeError> {
        self.set_archived(id.into(), true).await
    }

    /// Unarchives a quest.
    pub async fn unarchive_quest(&self, id: impl Into<QuestId>) -> Result<(), RuntimeError> {
        self.set_archived(id.into(), false).await
    }

    /// Full XP log in insertion order.
    pub async fn logs(&self) -> Result<Vec<XpLogEntry>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Logs { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Log entries dated within the trailing `days`-day window.
    pub async fn recent_logs(&self, days: u64) -> Result<Vec<XpLogEntry>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::RecentLogs { days, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// All quests, archived included.
    pub async fn quests(&self) -> Result<Vec<Quest>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Quests { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Per-domain stats with streak records attached.
    pub async fn domain_stats(&self) -> Result<Vec<DomainStats>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::DomainStats { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Sorted union of domains from the log and quests.
    pub async fn all_domains(&self) -> Result<Vec<String>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::AllDomains { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Streak record for `domain`, if any.
    pub async fn streak(
        &self,
        domain: impl Into<String>,
    ) -> Result<Option<StreakRecord>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Streak {
                domain: domain.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Stops the writer loop after in-flight commands drain.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    async fn set_archived(&self, id: QuestId, archived: bool) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::ArchiveQuest {
                id,
                archived,
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }
}

async fn handle_command<S>(
    cmd: Command,
    tracker: &Arc<Mutex<Tracker<S>>>,
    events_tx: &broadcast::Sender<TrackerEvent>,
) -> bool
where
    S: StateStore + 'static,
{
    match cmd {
        Command::AppendLog { draft, resp } => {
            let res = run_blocking(tracker, move |t| t.append_log(draft)).await;
            if let Ok((entry, _)) = &res {
                let _ = events_tx.send(TrackerEvent::LogAppended {
                    domain: entry.domain.clone(),
                    xp: entry.xp,
                });
            }
            let _ = resp.send(res);
        }
        Command::AddQuest { draft, resp } => {
            let res = run_blocking(tracker, move |t| t.add_quest(draft)).await;
            if let Ok(quest) = &res {
                let _ = events_tx.send(TrackerEvent::QuestAdded {
                    id: quest.id.clone(),
                });
            }
            let _ = resp.send(res);
        }
        Command::CompleteQuest { id, resp } => {
            let res = run_blocking(tracker, move |t| t.complete_quest(&id)).await;
            if let Ok((quest, _)) = &res {
                let _ = events_tx.send(TrackerEvent::QuestCompleted {
                    id: quest.id.clone(),
                });
            }
            let _ = resp.send(res);
        }
        Command::UndoQuest { id, resp } => {
            let res = run_blocking(tracker, move |t| t.undo_quest(&id)).await;
            if let Ok(quest) = &res {
                let _ = events_tx.send(TrackerEvent::QuestUndone {
                    id: quest.id.clone(),
                });
            }
            let _ = resp.send(res);
        }
        Command::ArchiveQuest { id, archived, resp } => {
            let event_id = id.clone();
            let res = run_blocking(tracker, move |t| {
                if archived {
                    t.archive_quest(&id)
                } else {
                    t.unarchive_quest(&id)
                }
            })
            .await;
            if res.is_ok() {
                let event = if archived {
                    TrackerEvent::QuestArchived { id: event_id }
                } else {
                    TrackerEvent::QuestUnarchived { id: event_id }
                };
                let _ = events_tx.send(event);
            }
            let _ = resp.send(res);
        }
        Command::Logs { resp } => {
            if let Ok(v) = run_read(tracker, |t| t.logs()).await {
                let _ = resp.send(v);
            }
        }
        Command::RecentLogs { days, resp } => {
            if let Ok(v) = run_read(tracker, move |t| t.recent_logs(days)).await {
                let _ = resp.send(v);
            }
        }
        Command::Quests { resp } => {
            if let Ok(v) = run_read(tracker, |t| t.quests()).await {
                let _ = resp.send(v);
            }
        }
        Command::DomainStats { resp } => {
            if let Ok(v) = run_read(tracker, |t| t.domain_stats()).await {
                let _ = resp.send(v);
            }
        }
        Command::AllDomains { resp } => {
            if let Ok(v) = run_read(tracker, |t| t.all_domains()).await {
                let _ = resp.send(v);
            }
        }
        Command::Streak { domain, resp } => {
            if let Ok(v) = run_read(tracker, move |t| t.streak(&domain)).await {
                let _ = resp.send(v);
            }
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }

    false
}

/// Runs a mutating tracker call on the blocking pool. Store I/O is
/// synchronous, so it must not run on the runtime worker thread.
async fn run_blocking<S, T>(
    tracker: &Arc<Mutex<Tracker<S>>>,
    f: impl FnOnce(&mut Tracker<S>) -> Result<T, TrackerError> + Send + 'static,
) -> Result<T, RuntimeError>
where
    S: StateStore + 'static,
    T: Send + 'static,
{
    let tracker = Arc::clone(tracker);
    tokio::task::spawn_blocking(move || {
        let mut guard = tracker.blocking_lock();
        f(&mut guard)
    })
    .await
    .map_err(|_| RuntimeError::ChannelClosed)?
    .map_err(RuntimeError::from)
}

async fn run_read<S, T>(
    tracker: &Arc<Mutex<Tracker<S>>>,
    f: impl FnOnce(&Tracker<S>) -> T + Send + 'static,
) -> Result<T, RuntimeError>
where
    S: StateStore + 'static,
    T: Send + 'static,
{
    let tracker = Arc::clone(tracker);
    tokio::task::spawn_blocking(move || {
        let guard = tracker.blocking_lock();
        f(&guard)
    })
    .await
    .map_err(|_| RuntimeError::ChannelClosed)
}
