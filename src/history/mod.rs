//! Calculation history.
//!
//! Settled calculations are kept most-recent-first and capped at a fixed
//! number of entries. Persistence goes through a [`HistoryStore`]; a store
//! failure is logged and never interrupts the calculator.

mod store;

pub use store::{HistoryStore, JsonFileStore};

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of entries kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// A single settled calculation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique within the history, increasing with recency.
    pub id: u64,
    pub expression: String,
    pub result: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// In-memory history backed by a store.
pub struct History<S: HistoryStore> {
    store: S,
    entries: Vec<HistoryEntry>,
    limit: usize,
}

impl<S: HistoryStore> History<S> {
    /// Load history from `store`, keeping at most `limit` entries.
    ///
    /// An unreadable store starts an empty history. The limit is at least one.
    pub fn open(store: S, limit: usize) -> Self {
        let limit = limit.max(1);
        let mut entries = store.load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load history: {:#}", e);
            Vec::new()
        });
        entries.truncate(limit);

        Self {
            store,
            entries,
            limit,
        }
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a calculation now.
    pub fn record(&mut self, expression: &str, result: &str) -> &HistoryEntry {
        self.record_at(expression, result, now_millis())
    }

    /// Record a calculation at `timestamp`, dropping the oldest entries past the limit.
    pub fn record_at(&mut self, expression: &str, result: &str, timestamp: u64) -> &HistoryEntry {
        let id = match self.entries.first() {
            Some(latest) if latest.id >= timestamp => latest.id + 1,
            _ => timestamp,
        };

        self.entries.insert(
            0,
            HistoryEntry {
                id,
                expression: expression.to_string(),
                result: result.to_string(),
                timestamp,
            },
        );
        self.entries.truncate(self.limit);

        if let Err(e) = self.store.save(&self.entries) {
            tracing::warn!("Failed to save history: {:#}", e);
        }

        &self.entries[0]
    }

    /// Forget every entry, in memory and in the store.
    pub fn clear(&mut self) -> anyhow::Result<()> {
        self.entries.clear();
        self.store.clear()
    }
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Describe `timestamp` relative to `now` (both in milliseconds).
///
/// Recent entries read "Just now", "5m ago", "3h ago" or "2d ago"; anything a
/// week or older is shown as a `YYYY-MM-DD` date (UTC).
pub fn format_timestamp(timestamp: u64, now: u64) -> String {
    let minutes = now.saturating_sub(timestamp) / 60_000;
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h ago", hours);
    }

    let days = hours / 24;
    if days < 7 {
        return format!("{}d ago", days);
    }

    i64::try_from(timestamp)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Shorten `text` to at most `max_len` characters, ending in `...` when cut.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}
