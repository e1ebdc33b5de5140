//! File-backed XP tracking with streaks, levels, and quest bookkeeping.
//!
//! # Examples
//!
//! In-memory usage with [`core::tracker::Tracker`]:
//! ```
//! use xplog::{
//!     core::tracker::Tracker,
//!     entry::LogDraft,
//!     persist::memory::MemoryStore,
//! };
//!
//! let mut tracker = Tracker::new(MemoryStore::default());
//! let (entry, streak) = tracker.append_log(LogDraft {
//!     domain: "Fitness".to_string(),
//!     task: "Run 5k".to_string(),
//!     xp: 50,
//! }).expect("append");
//! assert_eq!(entry.xp, 50);
//! assert_eq!(streak.current_streak, 1);
//! ```
//!
//! Runtime usage with the JSON document store:
//! ```no_run
//! use xplog::{
//!     core::tracker::Tracker,
//!     persist::json::JsonStateStore,
//!     quest::QuestDraft,
//!     runtime::handle::{spawn_tracker, RuntimeConfig},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = JsonStateStore::open("data").expect("open data dir");
//! let handle = spawn_tracker(Tracker::new(store), RuntimeConfig::default());
//! let quest = handle.add_quest(QuestDraft {
//!     domain: "Reading".to_string(),
//!     description: "Finish chapter 4".to_string(),
//!     xp: 25,
//! }).await.expect("add quest");
//! let _ = handle.complete_quest(quest.id.clone()).await.expect("complete");
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Tracker over a state store: log append and quest lifecycle.
pub mod core;
/// XP log entry record and draft.
pub mod entry;
/// Persistence abstraction, JSON document store, and memory store.
pub mod persist;
/// Quest record and draft.
pub mod quest;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Read-side projections: domain stats, levels, recent logs.
pub mod stats;
/// Per-domain streak records and the advance rule.
pub mod streak;
/// Shared primitive types.
pub mod types;
