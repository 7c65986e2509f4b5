use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::RetentionMode;
use crate::models::Snapshot;

const FIRST_SEEN_FILE: &str = "first_seen.json";
const SNAPSHOTS_FILE: &str = "snapshots.json";
const LAST_SNAPSHOT_FILE: &str = "last_snapshot.json";

/// Pool address -> timestamp of the first run that observed it. Entries are
/// written once and never overwritten.
pub type FirstSeenMap = HashMap<String, String>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("state serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Bounded per-pool snapshot history, oldest first. The bound is 1 in
/// last-only retention.
#[derive(Debug, Clone)]
pub struct SnapshotBook {
    entries: HashMap<String, Vec<Snapshot>>,
    limit: usize,
}

impl SnapshotBook {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            limit: limit.max(1),
        }
    }

    pub fn last(&self, address: &str) -> Option<&Snapshot> {
        self.entries.get(address).and_then(|history| history.last())
    }

    #[allow(dead_code)]
    pub fn history(&self, address: &str) -> &[Snapshot] {
        self.entries.get(address).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append a snapshot, evicting the oldest entries beyond the bound.
    pub fn push(&mut self, address: &str, snapshot: Snapshot) {
        let history = self.entries.entry(address.to_string()).or_default();
        history.push(snapshot);
        let excess = history.len().saturating_sub(self.limit);
        if excess > 0 {
            history.drain(..excess);
        }
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Flat-file state store: first-seen timestamps plus snapshot history, one
/// JSON document each under an injected data dir. Reads degrade to empty on
/// missing or corrupt files; writes are whole-file replacements and their
/// failures are fatal to the run.
pub struct StateStore {
    data_dir: PathBuf,
    retention: RetentionMode,
    history_limit: usize,
}

impl StateStore {
    pub fn new(data_dir: impl Into<PathBuf>, retention: RetentionMode, history_limit: usize) -> Self {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).ok();
        Self {
            data_dir,
            retention,
            history_limit,
        }
    }

    fn snapshot_limit(&self) -> usize {
        match self.retention {
            RetentionMode::History => self.history_limit,
            RetentionMode::LastOnly => 1,
        }
    }

    fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
        let file = File::open(path).ok()?;
        match serde_json::from_reader(BufReader::new(file)) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("corrupt state file {}, starting empty: {}", path.display(), e);
                None
            }
        }
    }

    fn save_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), value)?;
        Ok(())
    }

    pub fn load_first_seen(&self) -> FirstSeenMap {
        Self::load_json(&self.data_dir.join(FIRST_SEEN_FILE)).unwrap_or_default()
    }

    pub fn save_first_seen(&self, map: &FirstSeenMap) -> Result<(), StoreError> {
        Self::save_json(&self.data_dir.join(FIRST_SEEN_FILE), map)
    }

    pub fn load_snapshots(&self) -> SnapshotBook {
        let mut book = SnapshotBook::new(self.snapshot_limit());
        match self.retention {
            RetentionMode::History => {
                let entries: HashMap<String, Vec<Snapshot>> =
                    Self::load_json(&self.data_dir.join(SNAPSHOTS_FILE)).unwrap_or_default();
                for (address, history) in entries {
                    for snapshot in history {
                        book.push(&address, snapshot);
                    }
                }
            }
            RetentionMode::LastOnly => {
                let entries: HashMap<String, Snapshot> =
                    Self::load_json(&self.data_dir.join(LAST_SNAPSHOT_FILE)).unwrap_or_default();
                for (address, snapshot) in entries {
                    book.push(&address, snapshot);
                }
            }
        }
        book
    }

    pub fn save_snapshots(&self, book: &SnapshotBook) -> Result<(), StoreError> {
        match self.retention {
            RetentionMode::History => {
                Self::save_json(&self.data_dir.join(SNAPSHOTS_FILE), &book.entries)
            }
            RetentionMode::LastOnly => {
                let last: HashMap<&String, &Snapshot> = book
                    .entries
                    .iter()
                    .filter_map(|(address, history)| history.last().map(|s| (address, s)))
                    .collect();
                Self::save_json(&self.data_dir.join(LAST_SNAPSHOT_FILE), &last)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PoolMetrics;
    use tempfile::TempDir;

    fn snapshot(price: f64) -> Snapshot {
        Snapshot::new(
            "2026-01-01T00:00:00+00:00".to_string(),
            &PoolMetrics {
                current_price: price,
                ..Default::default()
            },
        )
    }

    #[test]
    fn missing_files_load_empty() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path(), RetentionMode::History, 50);
        assert!(store.load_first_seen().is_empty());
        assert!(store.load_snapshots().is_empty());
    }

    #[test]
    fn corrupt_files_load_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(FIRST_SEEN_FILE), "{not json").unwrap();
        fs::write(dir.path().join(SNAPSHOTS_FILE), "[1, 2, 3]").unwrap();
        let store = StateStore::new(dir.path(), RetentionMode::History, 50);
        assert!(store.load_first_seen().is_empty());
        assert!(store.load_snapshots().is_empty());
    }

    #[test]
    fn first_seen_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path(), RetentionMode::History, 50);

        let mut map = FirstSeenMap::new();
        map.insert("pool1".into(), "2026-01-01T00:00:00+00:00".into());
        store.save_first_seen(&map).unwrap();

        assert_eq!(store.load_first_seen(), map);
    }

    #[test]
    fn history_bound_keeps_most_recent_in_order() {
        let mut book = SnapshotBook::new(50);
        for i in 0..60 {
            book.push("pool1", snapshot(i as f64));
        }
        let history = book.history("pool1");
        assert_eq!(history.len(), 50);
        assert_eq!(history[0].current_price, 10.0);
        assert_eq!(history[49].current_price, 59.0);
        assert_eq!(book.last("pool1").unwrap().current_price, 59.0);
    }

    #[test]
    fn history_round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path(), RetentionMode::History, 50);

        let mut book = store.load_snapshots();
        book.push("pool1", snapshot(1.0));
        book.push("pool1", snapshot(2.0));
        store.save_snapshots(&book).unwrap();

        let reloaded = store.load_snapshots();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.history("pool1").len(), 2);
        assert_eq!(reloaded.last("pool1").unwrap().current_price, 2.0);
    }

    #[test]
    fn last_only_retention_keeps_single_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path(), RetentionMode::LastOnly, 50);

        let mut book = store.load_snapshots();
        book.push("pool1", snapshot(1.0));
        book.push("pool1", snapshot(2.0));
        assert_eq!(book.history("pool1").len(), 1);
        store.save_snapshots(&book).unwrap();

        let reloaded = store.load_snapshots();
        assert_eq!(reloaded.history("pool1").len(), 1);
        assert_eq!(reloaded.last("pool1").unwrap().current_price, 2.0);
        assert!(dir.path().join(LAST_SNAPSHOT_FILE).exists());
        assert!(!dir.path().join(SNAPSHOTS_FILE).exists());
    }

    #[test]
    fn save_into_unwritable_dir_errors() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("gone"), RetentionMode::History, 50);
        fs::remove_dir_all(dir.path().join("gone")).unwrap();

        let result = store.save_first_seen(&FirstSeenMap::new());
        assert!(result.is_err());
    }
}
