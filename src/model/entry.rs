use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PathError;
use crate::model::path::{PathKey, normalize};

/// One recently used file.
///
/// The path is fixed at construction; only the pin flag and access time
/// change afterwards. Two entries are equal when their keys match.
#[derive(Debug, Clone, Serialize)]
pub struct PathEntry {
    path: String,
    #[serde(skip)]
    key: PathKey,
    pinned: bool,
    last_access: DateTime<Utc>,
}

impl PathEntry {
    /// Create an unpinned entry accessed now.
    pub fn new(raw_path: &str) -> Result<PathEntry, PathError> {
        PathEntry::with_details(raw_path, false, Utc::now())
    }

    pub fn with_details(
        raw_path: &str,
        pinned: bool,
        last_access: DateTime<Utc>,
    ) -> Result<PathEntry, PathError> {
        let path = normalize(raw_path)?;
        let key = PathKey::from_normalized(&path);
        Ok(PathEntry {
            path,
            key,
            pinned,
            last_access,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn key(&self) -> &PathKey {
        &self.key
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn last_access(&self) -> DateTime<Utc> {
        self.last_access
    }

    pub(crate) fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
    }

    pub(crate) fn touch(&mut self, at: DateTime<Utc>) {
        self.last_access = at;
    }

    /// The on-disk shape of this entry.
    pub fn to_record(&self) -> EntryRecord {
        EntryRecord {
            path: self.path.clone(),
            pinned: self.pinned,
            last_access: self.last_access,
        }
    }

    /// Rebuild an entry from its stored record, normalizing the path.
    /// Does not check that the file still exists.
    pub fn from_record(record: EntryRecord) -> Result<PathEntry, PathError> {
        PathEntry::with_details(&record.path, record.pinned, record.last_access)
    }
}

impl PartialEq for PathEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for PathEntry {}

/// Persisted form of a `PathEntry`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub path: String,
    #[serde(default)]
    pub pinned: bool,
    pub last_access: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn construction_normalizes() {
        let entry = PathEntry::new("C:/work/../notes.txt").unwrap();
        assert_eq!(entry.path(), "C:\\notes.txt");
        assert!(!entry.is_pinned());
    }

    #[test]
    fn construction_rejects_short_paths() {
        assert_eq!(PathEntry::new(""), Err(PathError::Empty));
        assert!(matches!(PathEntry::new("C"), Err(PathError::TooShort(_))));
    }

    #[test]
    fn equality_ignores_case_for_windows_paths() {
        let a = PathEntry::new("C:\\Notes.txt").unwrap();
        let b = PathEntry::new("c:\\notes.TXT").unwrap();
        assert_eq!(a, b);
        // Spelling of the first construction is kept
        assert_eq!(a.path(), "C:\\Notes.txt");
    }

    #[test]
    fn equality_ignores_metadata() {
        let t = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let a = PathEntry::with_details("/srv/a.log", true, t).unwrap();
        let b = PathEntry::with_details("/srv/a.log", false, Utc::now()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn record_round_trip_preserves_fields() {
        let t = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let entry = PathEntry::with_details("/srv/a.log", true, t).unwrap();
        let back = PathEntry::from_record(entry.to_record()).unwrap();
        assert_eq!(back.path(), "/srv/a.log");
        assert!(back.is_pinned());
        assert_eq!(back.last_access(), t);
    }
}
