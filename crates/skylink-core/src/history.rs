//! Client-side tracking lookup history.
//!
//! The history is a small most-recent-first list that lives with the
//! client (a browser's local storage, or here a JSON file in the user's data
//! directory). There is no server-side copy.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Maximum number of remembered lookups.
pub const HISTORY_CAPACITY: usize = 10;

/// One remembered lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// The tracking number as searched.
    pub tracking_number: String,
    /// When the lookup happened.
    pub searched_at: DateTime<Utc>,
}

/// Most-recent-first list of lookups, capped at [`HISTORY_CAPACITY`].
///
/// Recording a number that is already present moves it to the front, so
/// each number appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingHistory {
    entries: Vec<HistoryEntry>,
}

impl TrackingHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lookup made now.
    pub fn record(&mut self, tracking_number: impl Into<String>) {
        self.record_at(tracking_number, Utc::now());
    }

    /// Records a lookup made at `searched_at`.
    pub fn record_at(&mut self, tracking_number: impl Into<String>, searched_at: DateTime<Utc>) {
        let tracking_number = tracking_number.into();
        self.entries.retain(|e| e.tracking_number != tracking_number);
        self.entries.insert(
            0,
            HistoryEntry {
                tracking_number,
                searched_at,
            },
        );
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// Removes one number. Returns whether it was present.
    pub fn remove(&mut self, tracking_number: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.tracking_number != tracking_number);
        self.entries.len() != before
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Re-applies the invariants to data read from disk.
    fn normalized(entries: Vec<HistoryEntry>) -> Self {
        let mut history = Self::new();
        for entry in entries.into_iter().rev() {
            history.record_at(entry.tracking_number, entry.searched_at);
        }
        history
    }
}

/// JSON file holding a [`TrackingHistory`].
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Store backed by an explicit file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform data directory (`<data_dir>/skylink/history.json`).
    pub fn default_location() -> Result<Self> {
        let dir = dirs::data_dir()
            .ok_or_else(|| Error::config("Could not determine data directory for history"))?;
        Ok(Self::new(dir.join("skylink").join("history.json")))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the history. A missing or unreadable file yields an empty history.
    pub fn load(&self) -> TrackingHistory {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return TrackingHistory::new(),
            Err(e) => {
                log::warn!("Ignoring unreadable history at {}: {e}", self.path.display());
                return TrackingHistory::new();
            }
        };

        match serde_json::from_str::<Vec<HistoryEntry>>(&content) {
            Ok(entries) => TrackingHistory::normalized(entries),
            Err(e) => {
                log::warn!("Ignoring corrupt history at {}: {e}", self.path.display());
                TrackingHistory::new()
            }
        }
    }

    /// Writes the history, creating parent directories as needed.
    pub fn save(&self, history: &TrackingHistory) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(history)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Loads, records a lookup, saves, and returns the updated history.
    pub fn record(&self, tracking_number: &str) -> Result<TrackingHistory> {
        let mut history = self.load();
        history.record(tracking_number);
        self.save(&history)?;
        Ok(history)
    }
}
