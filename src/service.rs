//! Shared front door to a recent list.
//!
//! The host application builds one `MruListService` at startup and hands
//! references to every consumer. All operations run under one lock and
//! observers hear about each successful change over a channel.

use std::path::Path;
use std::sync::mpsc;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, warn};

use crate::error::{PathError, StoreError};
use crate::io::lock::FileLock;
use crate::io::store;
use crate::model::config::MruConfig;
use crate::model::entry::PathEntry;
use crate::model::list::{Direction, MruList, UpsertOutcome};
use crate::ops::snapshot::RecencyGroup;

/// Change notification sent to subscribers after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MruEvent {
    /// A new path entered the list.
    Added(String),
    /// An existing entry's access time was refreshed.
    Touched(String),
    Removed(String),
    Moved { path: String, direction: Direction },
    PinChanged { path: String, pinned: bool },
    /// Dropped for being over capacity.
    Evicted(String),
    Cleared { removed: usize },
    /// The whole list was replaced (load or `replace_list`).
    Reloaded { len: usize },
}

pub struct MruListService {
    list: Mutex<MruList>,
    config: MruConfig,
    subscribers: Mutex<Vec<mpsc::Sender<MruEvent>>>,
}

impl MruListService {
    pub fn new(config: MruConfig) -> Self {
        Self::with_list(MruList::new(), config)
    }

    pub fn with_list(list: MruList, config: MruConfig) -> Self {
        MruListService {
            list: Mutex::new(list),
            config,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &MruConfig {
        &self.config
    }

    pub fn max_size(&self) -> usize {
        self.config.list.max_size
    }

    /// Receive an `MruEvent` for every change from now on.
    pub fn subscribe(&self) -> mpsc::Receiver<MruEvent> {
        let (tx, rx) = mpsc::channel();
        lock(&self.subscribers).push(tx);
        rx
    }

    fn publish(&self, events: Vec<MruEvent>) {
        if events.is_empty() {
            return;
        }
        let mut subscribers = lock(&self.subscribers);
        subscribers.retain(|tx| events.iter().all(|ev| tx.send(ev.clone()).is_ok()));
    }

    /// Build an entry without adding it.
    pub fn create_entry(
        path: &str,
        pinned: bool,
        last_access: Option<DateTime<Utc>>,
    ) -> Result<PathEntry, PathError> {
        PathEntry::with_details(path, pinned, last_access.unwrap_or_else(Utc::now))
    }

    /// Record an access to `path` now, then trim to capacity. The entry just
    /// recorded is never the one evicted.
    pub fn update_entry(&self, path: &str, pinned: Option<bool>) -> bool {
        self.update_entry_at(path, pinned, Utc::now())
    }

    pub fn update_entry_at(&self, path: &str, pinned: Option<bool>, at: DateTime<Utc>) -> bool {
        let mut events = Vec::new();
        {
            let mut list = lock(&self.list);
            let was_pinned = list.get(path).map(|e| e.is_pinned());
            let outcome = match list.try_upsert(path, pinned, at) {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(path, error = %e, "rejected path");
                    return false;
                }
            };
            let Some(entry) = list.get(path) else {
                return false;
            };
            let stored = entry.path().to_string();
            let now_pinned = entry.is_pinned();
            match outcome {
                UpsertOutcome::Inserted => events.push(MruEvent::Added(stored.clone())),
                UpsertOutcome::Updated => events.push(MruEvent::Touched(stored.clone())),
            }
            if was_pinned.is_some_and(|p| p != now_pinned) {
                events.push(MruEvent::PinChanged {
                    path: stored,
                    pinned: now_pinned,
                });
            }
            for gone in list.evict_sparing(self.max_size(), path) {
                events.push(MruEvent::Evicted(gone.path().to_string()));
            }
        }
        self.publish(events);
        true
    }

    pub fn remove_entry(&self, path: &str) -> bool {
        let removed = lock(&self.list).remove(path);
        match removed {
            Some(entry) => {
                debug!(path = entry.path(), "removed entry");
                self.publish(vec![MruEvent::Removed(entry.path().to_string())]);
                true
            }
            None => false,
        }
    }

    pub fn move_entry(&self, path: &str, direction: Direction) -> bool {
        let moved = {
            let mut list = lock(&self.list);
            if list.move_entry(path, direction) {
                list.get(path).map(|e| e.path().to_string())
            } else {
                None
            }
        };
        match moved {
            Some(path) => {
                self.publish(vec![MruEvent::Moved { path, direction }]);
                true
            }
            None => false,
        }
    }

    pub fn set_pinned(&self, path: &str, pinned: bool) -> bool {
        let changed = {
            let mut list = lock(&self.list);
            if list.set_pinned(path, pinned) {
                list.get(path).map(|e| e.path().to_string())
            } else {
                None
            }
        };
        match changed {
            Some(path) => {
                self.publish(vec![MruEvent::PinChanged { path, pinned }]);
                true
            }
            None => false,
        }
    }

    /// Drop entries; returns how many went.
    pub fn clear(&self, keep_pinned: bool) -> usize {
        let removed = lock(&self.list).clear(keep_pinned);
        if removed > 0 {
            self.publish(vec![MruEvent::Cleared { removed }]);
        }
        removed
    }

    pub fn len(&self) -> usize {
        lock(&self.list).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.list).is_empty()
    }

    pub fn get(&self, path: &str) -> Option<PathEntry> {
        lock(&self.list).get(path).cloned()
    }

    /// Copy of all entries in manual order.
    pub fn entries(&self) -> Vec<PathEntry> {
        lock(&self.list).entries().cloned().collect()
    }

    /// Entries grouped by band relative to `now`, in `now`'s time zone.
    pub fn grouped_snapshot<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<RecencyGroup> {
        lock(&self.list).snapshot_at(now, self.config.list.week_start)
    }

    /// Copy of the current list.
    pub fn list(&self) -> MruList {
        lock(&self.list).clone()
    }

    pub fn serialize(&self) -> Result<Vec<u8>, StoreError> {
        store::serialize_list(&lock(&self.list))
    }

    pub fn deserialize(bytes: &[u8]) -> Result<MruList, StoreError> {
        store::deserialize_list(bytes)
    }

    /// Swap in a whole new list, trimmed to capacity.
    pub fn replace_list(&self, mut list: MruList) {
        list.evict_if_over_capacity(self.max_size());
        let len = list.len();
        *lock(&self.list) = list;
        self.publish(vec![MruEvent::Reloaded { len }]);
    }

    /// Install the list decoded from `bytes`. On failure the service holds
    /// an empty list and the error is returned.
    pub fn load(&self, bytes: &[u8]) -> Result<(), StoreError> {
        match Self::deserialize(bytes) {
            Ok(list) => {
                self.replace_list(list);
                Ok(())
            }
            Err(e) => {
                self.replace_list(MruList::new());
                Err(e)
            }
        }
    }

    /// Load from a store file under its lock. A corrupt file leaves the
    /// service empty and returns the error.
    pub fn load_from(&self, path: &Path) -> Result<(), StoreError> {
        let _lock = FileLock::acquire_default(path)?;
        match store::read_store_from(path) {
            Ok(list) => {
                self.replace_list(list);
                Ok(())
            }
            Err(e) => {
                self.replace_list(MruList::new());
                Err(e)
            }
        }
    }

    /// Save to a store file under its lock.
    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        let _lock = FileLock::acquire_default(path)?;
        let list = self.list();
        store::write_store_to(path, &list)
    }
}

/// Every mutation is all-or-nothing, so a poisoned lock still guards a
/// consistent value.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
