//! Read-side projections over the XP log: per-domain totals, levels, and
//! progress, plus domain enumeration and recent-window filtering.
//!
//! Everything here is pure over already-loaded collections; nothing touches
//! storage.

use chrono::{Days, NaiveDate};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::entry::XpLogEntry;
use crate::quest::Quest;
use crate::streak::StreakRecord;

/// XP needed to advance one level.
pub const XP_PER_LEVEL: u64 = 100;

/// Derived per-domain aggregate. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainStats {
    /// Domain the stats describe.
    pub domain: String,
    /// Sum of `xp` over all log entries for the domain.
    pub total_xp: u64,
    /// Mastery tier: `total_xp / 100`, rounded down.
    pub level: u64,
    /// Progress within the current level: `total_xp % 100`.
    pub progress_percent: u64,
    /// Streak record for the domain, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak: Option<StreakRecord>,
}

/// Level for a running XP total.
pub fn level_for(total_xp: u64) -> u64 {
    total_xp / XP_PER_LEVEL
}

/// Progress within the current level for a running XP total.
pub fn progress_for(total_xp: u64) -> u64 {
    total_xp % XP_PER_LEVEL
}

/// Groups log entries by domain and derives totals, levels, and progress.
///
/// Domains with no entries never appear. Output is sorted by domain name.
/// Streak attachment is left to the caller ([`DomainStats::streak`] is
/// `None` here).
pub fn domain_stats(logs: &[XpLogEntry]) -> Vec<DomainStats> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for entry in logs {
        *totals.entry(entry.domain.as_str()).or_default() += u64::from(entry.xp);
    }

    let mut stats: Vec<DomainStats> = totals
        .into_iter()
        .map(|(domain, total_xp)| DomainStats {
            domain: domain.to_string(),
            total_xp,
            level: level_for(total_xp),
            progress_percent: progress_for(total_xp),
            streak: None,
        })
        .collect();
    stats.sort_by(|a, b| a.domain.cmp(&b.domain));
    stats
}

/// Union of domain names seen in the log and in quests, deduplicated and
/// sorted ascending.
pub fn all_domains(logs: &[XpLogEntry], quests: &[Quest]) -> Vec<String> {
    let mut domains = BTreeSet::new();
    for entry in logs {
        domains.insert(entry.domain.clone());
    }
    for quest in quests {
        domains.insert(quest.domain.clone());
    }
    domains.into_iter().collect()
}

/// Log entries dated within the trailing `days`-day window ending at `today`.
pub fn recent_logs(logs: &[XpLogEntry], days: u64, today: NaiveDate) -> Vec<XpLogEntry> {
    let cutoff = today - Days::new(days);
    logs.iter()
        .filter(|entry| entry.date >= cutoff)
        .cloned()
        .collect()
}
