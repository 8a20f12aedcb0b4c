use chrono::{DateTime, Local, TimeZone, Utc};
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::PathError;
use crate::model::entry::PathEntry;
use crate::model::path::PathKey;
use crate::ops::classify::WeekStart;
use crate::ops::snapshot::{RecencyGroup, group_entries};

/// Direction for manual reordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// What an upsert did to the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Ordered set of recently used paths, keyed by normalized path.
///
/// Map order is the manual order. Pinned entries always come before
/// unpinned ones in that order; display order is derived separately by
/// `snapshot`.
#[derive(Debug, Clone, Default)]
pub struct MruList {
    entries: IndexMap<PathKey, PathEntry>,
}

impl MruList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from entries in manual order. Pinned entries are moved
    /// ahead of unpinned ones, keeping relative order.
    ///
    /// Entries sharing a key merge into the first occurrence, which takes the
    /// latest access time and is pinned if any copy was.
    pub fn from_ordered(entries: impl IntoIterator<Item = PathEntry>) -> Self {
        let mut merged: IndexMap<PathKey, PathEntry> = IndexMap::new();
        for entry in entries {
            match merged.get_mut(entry.key()) {
                Some(existing) => {
                    debug!(path = entry.path(), "merging duplicate entry");
                    if entry.last_access() > existing.last_access() {
                        existing.touch(entry.last_access());
                    }
                    if entry.is_pinned() {
                        existing.set_pinned(true);
                    }
                }
                None => {
                    merged.insert(entry.key().clone(), entry);
                }
            }
        }

        let (pinned, unpinned): (Vec<_>, Vec<_>) =
            merged.into_iter().partition(|(_, e)| e.is_pinned());
        MruList {
            entries: pinned.into_iter().chain(unpinned).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pinned_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_pinned()).count()
    }

    /// Entries in manual order (pinned partition first).
    pub fn entries(&self) -> impl Iterator<Item = &PathEntry> {
        self.entries.values()
    }

    pub fn get(&self, path: &str) -> Option<&PathEntry> {
        let key = PathKey::for_path(path).ok()?;
        self.entries.get(&key)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Record an access to `path` at `at`.
    ///
    /// Existing entries keep their spelling and position; their timestamp
    /// is refreshed and, when `pinned` is `Some`, their pin state changes.
    pub fn try_upsert(
        &mut self,
        path: &str,
        pinned: Option<bool>,
        at: DateTime<Utc>,
    ) -> Result<UpsertOutcome, PathError> {
        let entry = PathEntry::with_details(path, pinned.unwrap_or(false), at)?;
        let key = entry.key().clone();

        if let Some(existing) = self.entries.get_mut(&key) {
            existing.touch(at);
            debug!(path = existing.path(), "refreshed entry");
            let was_pinned = existing.is_pinned();
            match pinned {
                Some(pin) if pin != was_pinned => self.apply_pin(&key, pin),
                _ => {}
            }
            return Ok(UpsertOutcome::Updated);
        }

        let index = if entry.is_pinned() { 0 } else { self.pinned_count() };
        debug!(path = entry.path(), pinned = entry.is_pinned(), "inserted entry");
        self.entries.shift_insert(index, key, entry);
        Ok(UpsertOutcome::Inserted)
    }

    /// Boolean form of `try_upsert`; `false` only when the path is invalid.
    pub fn upsert(&mut self, path: &str, pinned: Option<bool>, at: DateTime<Utc>) -> bool {
        match self.try_upsert(path, pinned, at) {
            Ok(_) => true,
            Err(e) => {
                warn!(path, error = %e, "rejected path");
                false
            }
        }
    }

    /// Insert a fully built entry, replacing any entry with the same key.
    pub fn insert_entry(&mut self, entry: PathEntry) {
        let key = entry.key().clone();
        self.entries.shift_remove(&key);
        let index = if entry.is_pinned() { 0 } else { self.pinned_count() };
        self.entries.shift_insert(index, key, entry);
    }

    /// Remove by normalized-path match. Returns the removed entry.
    pub fn remove(&mut self, path: &str) -> Option<PathEntry> {
        let key = PathKey::for_path(path).ok()?;
        self.entries.shift_remove(&key)
    }

    /// Swap `path` with its neighbour inside its own partition.
    /// Returns `false` at a partition boundary or when `path` is absent.
    pub fn move_entry(&mut self, path: &str, direction: Direction) -> bool {
        let Some(key) = PathKey::for_path(path).ok() else {
            return false;
        };
        let Some(index) = self.entries.get_index_of(&key) else {
            return false;
        };
        let pinned = self.entries[index].is_pinned();
        let neighbour = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => Some(index + 1).filter(|&i| i < self.entries.len()),
        };
        match neighbour {
            Some(other) if self.entries[other].is_pinned() == pinned => {
                self.entries.swap_indices(index, other);
                true
            }
            _ => false,
        }
    }

    /// Pin or unpin `path`. Returns `false` when absent or already in that state.
    pub fn set_pinned(&mut self, path: &str, pinned: bool) -> bool {
        let Some(key) = PathKey::for_path(path).ok() else {
            return false;
        };
        match self.entries.get(&key) {
            Some(entry) if entry.is_pinned() != pinned => {
                self.apply_pin(&key, pinned);
                true
            }
            _ => false,
        }
    }

    /// Move an entry into the partition matching `pinned`, at its front.
    fn apply_pin(&mut self, key: &PathKey, pinned: bool) {
        let Some(mut entry) = self.entries.shift_remove(key) else {
            return;
        };
        entry.set_pinned(pinned);
        let index = if pinned { 0 } else { self.pinned_count() };
        self.entries.shift_insert(index, key.clone(), entry);
    }

    /// Drop the oldest unpinned entries until at most `max_size` remain.
    /// Pinned entries are never evicted and do not count toward the limit.
    pub fn evict_if_over_capacity(&mut self, max_size: usize) -> Vec<PathEntry> {
        self.evict(max_size, None)
    }

    /// Like `evict_if_over_capacity`, but never evicts `path`. Used right
    /// after recording an access, when `path` is the most recent entry
    /// whatever the stored timestamps say.
    pub fn evict_sparing(&mut self, max_size: usize, path: &str) -> Vec<PathEntry> {
        let spared = PathKey::for_path(path).ok();
        self.evict(max_size, spared.as_ref())
    }

    fn evict(&mut self, max_size: usize, spared: Option<&PathKey>) -> Vec<PathEntry> {
        let mut evicted = Vec::new();
        loop {
            let unpinned = self.entries.values().filter(|e| !e.is_pinned()).count();
            if unpinned <= max_size {
                break;
            }
            // Oldest first; ties go to the entry later in manual order.
            let victim = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, (key, e))| !e.is_pinned() && Some(*key) != spared)
                .min_by(|(ia, (_, a)), (ib, (_, b))| {
                    a.last_access().cmp(&b.last_access()).then(ib.cmp(ia))
                })
                .map(|(i, _)| i);
            let Some(index) = victim else { break };
            if let Some((_, entry)) = self.entries.shift_remove_index(index) {
                debug!(path = entry.path(), "evicted entry over capacity");
                evicted.push(entry);
            }
        }
        evicted
    }

    /// Remove every entry, or only the unpinned ones.
    pub fn clear(&mut self, keep_pinned: bool) -> usize {
        let before = self.entries.len();
        if keep_pinned {
            self.entries.retain(|_, e| e.is_pinned());
        } else {
            self.entries.clear();
        }
        before - self.entries.len()
    }

    /// Entries grouped by recency band on the local calendar.
    pub fn snapshot(&self, now: DateTime<Local>) -> Vec<RecencyGroup> {
        self.snapshot_at(&now, WeekStart::default())
    }

    pub fn snapshot_at<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        week_start: WeekStart,
    ) -> Vec<RecencyGroup> {
        group_entries(self.entries(), now, week_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 11, 12, 0, 0).unwrap()
    }

    fn paths(list: &MruList) -> Vec<&str> {
        list.entries().map(|e| e.path()).collect()
    }

    #[test]
    fn upsert_inserts_then_updates() {
        let mut list = MruList::new();
        assert_eq!(
            list.try_upsert("/a/one.txt", None, t0()),
            Ok(UpsertOutcome::Inserted)
        );
        let later = t0() + Duration::hours(1);
        assert_eq!(
            list.try_upsert("/a/./one.txt", None, later),
            Ok(UpsertOutcome::Updated)
        );
        assert_eq!(list.len(), 1);
        assert_eq!(list.get("/a/one.txt").unwrap().last_access(), later);
    }

    #[test]
    fn upsert_same_windows_path_different_case() {
        let mut list = MruList::new();
        assert!(list.upsert("C:\\Docs\\A.txt", None, t0()));
        assert!(list.upsert("c:/docs/a.TXT", None, t0()));
        assert_eq!(list.len(), 1);
        assert_eq!(paths(&list), vec!["C:\\Docs\\A.txt"]);
    }

    #[test]
    fn upsert_rejects_invalid_paths() {
        let mut list = MruList::new();
        assert!(!list.upsert("", None, t0()));
        assert!(!list.upsert("C", None, t0()));
        assert!(list.is_empty());
    }

    #[test]
    fn upsert_none_keeps_pin_state() {
        let mut list = MruList::new();
        list.upsert("/a/b", Some(true), t0());
        list.upsert("/a/b", None, t0());
        assert!(list.get("/a/b").unwrap().is_pinned());
        list.upsert("/a/b", Some(false), t0());
        assert!(!list.get("/a/b").unwrap().is_pinned());
    }

    #[test]
    fn new_entries_enter_front_of_their_partition() {
        let mut list = MruList::new();
        list.upsert("/p/1", Some(true), t0());
        list.upsert("/u/1", None, t0());
        list.upsert("/u/2", None, t0());
        list.upsert("/p/2", Some(true), t0());
        assert_eq!(paths(&list), vec!["/p/2", "/p/1", "/u/2", "/u/1"]);
    }

    #[test]
    fn remove_by_normalized_match() {
        let mut list = MruList::new();
        list.upsert("/srv/data/x.csv", None, t0());
        assert!(list.remove("/srv/data/../data/x.csv").is_some());
        assert!(list.remove("/srv/data/x.csv").is_none());
        assert!(list.remove("").is_none());
    }

    #[test]
    fn move_up_then_down_restores_order() {
        let mut list = MruList::new();
        for p in ["/a/1", "/a/2", "/a/3"] {
            list.upsert(p, None, t0());
        }
        let before: Vec<String> = paths(&list).iter().map(|s| s.to_string()).collect();
        assert!(list.move_entry("/a/2", Direction::Up));
        assert_ne!(paths(&list), before);
        assert!(list.move_entry("/a/2", Direction::Down));
        assert_eq!(paths(&list), before);
    }

    #[test]
    fn move_stops_at_partition_boundaries() {
        let mut list = MruList::new();
        list.upsert("/u/1", None, t0());
        list.upsert("/p/1", Some(true), t0());
        // order: /p/1, /u/1
        assert!(!list.move_entry("/p/1", Direction::Up));
        assert!(!list.move_entry("/p/1", Direction::Down));
        assert!(!list.move_entry("/u/1", Direction::Up));
        assert!(!list.move_entry("/u/1", Direction::Down));
        assert!(!list.move_entry("/missing/x", Direction::Up));
        assert_eq!(paths(&list), vec!["/p/1", "/u/1"]);
    }

    #[test]
    fn set_pinned_moves_between_partitions() {
        let mut list = MruList::new();
        list.upsert("/u/1", None, t0());
        list.upsert("/u/2", None, t0());
        list.upsert("/p/1", Some(true), t0());
        assert!(list.set_pinned("/u/1", true));
        assert_eq!(paths(&list), vec!["/u/1", "/p/1", "/u/2"]);
        assert!(!list.set_pinned("/u/1", true));
        assert!(list.set_pinned("/p/1", false));
        assert_eq!(paths(&list), vec!["/u/1", "/p/1", "/u/2"]);
        assert!(!list.get("/p/1").unwrap().is_pinned());
        assert!(!list.set_pinned("/nope/x", true));
    }

    #[test]
    fn eviction_removes_oldest_unpinned() {
        let mut list = MruList::new();
        for (i, p) in ["/f/1", "/f/2", "/f/3", "/f/4"].iter().enumerate() {
            list.upsert(p, None, t0() + Duration::minutes(i as i64));
        }
        let evicted = list.evict_if_over_capacity(3);
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].path(), "/f/1");
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn eviction_ignores_pinned_entries() {
        let mut list = MruList::new();
        list.upsert("/old/pinned", Some(true), t0() - Duration::days(400));
        for (i, p) in ["/f/1", "/f/2", "/f/3"].iter().enumerate() {
            list.upsert(p, None, t0() + Duration::minutes(i as i64));
        }
        assert!(list.evict_if_over_capacity(3).is_empty());
        assert_eq!(list.len(), 4);

        let evicted = list.evict_if_over_capacity(1);
        let gone: Vec<&str> = evicted.iter().map(|e| e.path()).collect();
        assert_eq!(gone, vec!["/f/1", "/f/2"]);
        assert!(list.contains("/old/pinned"));
    }

    #[test]
    fn eviction_spares_the_entry_just_accessed() {
        let mut list = MruList::new();
        list.upsert("/skewed/future.txt", None, t0() + Duration::hours(1));
        list.upsert("/a/new.txt", None, t0());
        let evicted = list.evict_sparing(1, "/a/./new.txt");
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].path(), "/skewed/future.txt");
        assert_eq!(paths(&list), vec!["/a/new.txt"]);
    }

    #[test]
    fn from_ordered_merges_duplicates_into_first() {
        let list = MruList::from_ordered(vec![
            PathEntry::with_details("/u/1", false, t0()).unwrap(),
            PathEntry::with_details("C:\\Docs\\A.txt", false, t0()).unwrap(),
            PathEntry::with_details("c:/docs/a.TXT", true, t0() + Duration::hours(2)).unwrap(),
            PathEntry::with_details("/u/1", false, t0() - Duration::hours(1)).unwrap(),
        ]);
        assert_eq!(paths(&list), vec!["C:\\Docs\\A.txt", "/u/1"]);
        let merged = list.get("C:\\docs\\a.txt").unwrap();
        assert!(merged.is_pinned());
        assert_eq!(merged.last_access(), t0() + Duration::hours(2));
        assert_eq!(list.get("/u/1").unwrap().last_access(), t0());
    }

    #[test]
    fn clear_can_keep_pinned() {
        let mut list = MruList::new();
        list.upsert("/p/1", Some(true), t0());
        list.upsert("/u/1", None, t0());
        assert_eq!(list.clear(true), 1);
        assert_eq!(paths(&list), vec!["/p/1"]);
        assert_eq!(list.clear(false), 1);
        assert!(list.is_empty());
    }

    #[test]
    fn insert_entry_replaces_existing() {
        let mut list = MruList::new();
        list.upsert("/a/b", None, t0());
        let replacement = PathEntry::with_details("/a/b", true, t0()).unwrap();
        list.insert_entry(replacement);
        assert_eq!(list.len(), 1);
        assert!(list.get("/a/b").unwrap().is_pinned());
    }
}
