use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::model::entry::{EntryRecord, PathEntry};
use crate::model::list::MruList;

/// On-disk layout: one `[[entries]]` table per entry, in manual order.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    entries: Vec<EntryRecord>,
}

/// Get the store file path: `MRU_STORE`, else under XDG_CONFIG_HOME.
pub fn default_store_path() -> PathBuf {
    if let Ok(path) = std::env::var("MRU_STORE") {
        return PathBuf::from(path);
    }
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".config"));
    config_dir.join("mru").join("recent.toml")
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Encode a list as TOML bytes.
pub fn serialize_list(list: &MruList) -> Result<Vec<u8>, StoreError> {
    let file = StoreFile {
        entries: list.entries().map(PathEntry::to_record).collect(),
    };
    Ok(toml::to_string_pretty(&file)?.into_bytes())
}

/// Decode a list from TOML bytes.
///
/// Any malformed entry fails the whole load. Paths are normalized but not
/// checked against the filesystem. Duplicates merge as in
/// `MruList::from_ordered`.
pub fn deserialize_list(bytes: &[u8]) -> Result<MruList, StoreError> {
    let text = std::str::from_utf8(bytes)?;
    let file: StoreFile = toml::from_str(text)?;

    let entries = file
        .entries
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            PathEntry::from_record(record)
                .map_err(|source| StoreError::InvalidEntry { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MruList::from_ordered(entries))
}

/// Read the recent list from a specific path.
///
/// A missing file is an empty list. A file that cannot be parsed is backed
/// up as `.bak` and the error returned, so callers can fall back to empty.
pub fn read_store_from(path: &Path) -> Result<MruList, StoreError> {
    let bytes = match File::open(path) {
        Ok(mut file) => {
            let mut buf = Vec::new();
            file.read_to_end(&mut buf).map_err(|e| StoreError::Read {
                path: path.to_path_buf(),
                source: e,
            })?;
            buf
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(MruList::new()),
        Err(e) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    deserialize_list(&bytes).inspect_err(|e| {
        let bak = backup_path(path);
        let _ = fs::copy(path, &bak);
        warn!(
            path = %path.display(),
            backup = %bak.display(),
            error = %e,
            "could not parse recent list"
        );
    })
}

/// Read the recent list from the default location.
pub fn read_store() -> Result<MruList, StoreError> {
    read_store_from(&default_store_path())
}

/// Write the recent list to a specific path, atomically.
pub fn write_store_to(path: &Path, list: &MruList) -> Result<(), StoreError> {
    let bytes = serialize_list(list)?;
    atomic_write(path, &bytes).map_err(|e| StoreError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), entries = list.len(), "wrote recent list");
    Ok(())
}

/// Write the recent list to the default location.
pub fn write_store(list: &MruList) -> Result<(), StoreError> {
    write_store_to(&default_store_path(), list)
}

/// Where a corrupt store is copied before being replaced.
pub fn backup_path(path: &Path) -> PathBuf {
    path.with_extension("toml.bak")
}

/// Write `content` to `path` atomically using a temp file + rename.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
