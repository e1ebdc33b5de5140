//! Tracker core: read-modify-write operations over a state store.

/// Tracker operations and error taxonomy.
pub mod tracker;
