//! Autosave policy
//!
//! Every edit to the sheet is a save trigger. By default each trigger saves
//! immediately, since a store write is cheap and local. An optional debounce
//! interval coalesces bursts of keystrokes; edits skipped by the debounce stay
//! pending until the next save or an explicit flush.

use chrono::{DateTime, Duration, Utc};

/// The kind of edit that asked for a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTrigger {
    /// Text typed into a field.
    FieldInput,
    /// A select or field committed its value.
    FieldChange,
    /// A tracker point was toggled.
    TrackerToggle,
    /// Resolve was incremented or decremented.
    ResolveChange,
    /// A talent slot was filled, cleared or moved.
    TalentChange,
}

/// Decides when an edit is written to the store.
#[derive(Debug, Clone, Default)]
pub struct AutosaveManager {
    /// Minimum time between two triggered saves. `None` saves on every trigger.
    pub min_interval: Option<Duration>,

    /// Timestamp of the last successful save.
    pub last_save_time: Option<DateTime<Utc>>,

    pending: bool,
}

impl AutosaveManager {
    /// Save on every trigger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Coalesce triggers arriving within `interval_ms` of the last save.
    pub fn with_debounce(interval_ms: u64) -> Self {
        let interval_ms = i64::try_from(interval_ms).unwrap_or(i64::MAX);
        Self {
            min_interval: Some(Duration::milliseconds(interval_ms)),
            ..Self::default()
        }
    }

    /// Note that the sheet changed since the last save.
    pub fn mark_dirty(&mut self) {
        self.pending = true;
    }

    pub fn has_pending(&self) -> bool {
        self.pending
    }

    /// Check if `trigger` arriving at `now` should save. Only typed input is
    /// debounced; discrete edits always save.
    pub fn should_save(&self, trigger: SaveTrigger, now: DateTime<Utc>) -> bool {
        if trigger != SaveTrigger::FieldInput {
            return true;
        }

        match (self.min_interval, self.last_save_time) {
            (None, _) | (_, None) => true,
            (Some(interval), Some(last)) => now.signed_duration_since(last) >= interval,
        }
    }

    /// Record a successful save at `now`.
    pub fn record_save(&mut self, now: DateTime<Utc>) {
        self.last_save_time = Some(now);
        self.pending = false;
    }
}
