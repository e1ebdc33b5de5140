//! Shared primitive types.

/// Experience points awarded by a log entry or quest. Always positive
/// once validated at the API edge.
pub type Xp = u32;

/// Quest identifier: decimal millisecond timestamp, bumped when two quests
/// are created within the same millisecond so ids stay unique and increasing.
pub type QuestId = String;
