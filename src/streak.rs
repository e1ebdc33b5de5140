//! Per-domain streak records and the day-granularity advance rule.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Consecutive-day logging streak for one domain.
///
/// Serialized camelCase (`currentStreak`, `longestStreak`, `lastLogDate`)
/// to match the established on-disk streak document layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakRecord {
    /// Length of the streak ending at `last_log_date`.
    pub current_streak: u32,
    /// Longest streak ever observed for the domain.
    pub longest_streak: u32,
    /// Calendar day of the most recent log entry.
    pub last_log_date: NaiveDate,
}

/// Streak collection persisted as one document, keyed by domain.
pub type StreakMap = BTreeMap<String, StreakRecord>;

impl StreakRecord {
    /// Seed record for a domain's first log entry.
    pub fn first(date: NaiveDate) -> Self {
        Self {
            current_streak: 1,
            longest_streak: 1,
            last_log_date: date,
        }
    }

    /// Advances the streak for a log entry on `date`.
    ///
    /// A one-day gap extends the streak, a longer gap resets it to 1, and a
    /// same-day or out-of-order entry leaves the length untouched. The
    /// longest streak is raised to cover the current one, and
    /// `last_log_date` always takes the new date. `longest_streak >=
    /// current_streak` holds after every call.
    pub fn advance(&mut self, date: NaiveDate) {
        let diff_days = (date - self.last_log_date).num_days();
        if diff_days == 1 {
            self.current_streak += 1;
        } else if diff_days > 1 {
            self.current_streak = 1;
        }

        if self.current_streak > self.longest_streak {
            self.longest_streak = self.current_streak;
        }
        self.last_log_date = date;
    }
}

/// Advances (or lazily creates) the record for `domain` and returns a copy
/// of the updated record.
pub fn advance_domain(streaks: &mut StreakMap, domain: &str, date: NaiveDate) -> StreakRecord {
    let record = streaks
        .entry(domain.to_string())
        .and_modify(|r| r.advance(date))
        .or_insert_with(|| StreakRecord::first(date));
    record.clone()
}
