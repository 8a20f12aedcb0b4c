use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use tracing::trace;

/// How long `acquire_default` waits for a busy store.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Exclusive hold on a store file for one read-modify-write cycle.
///
/// The lock is an flock on a `.lock` sibling of the store, so two `mru`
/// processes editing the same list take turns. Dropping the guard closes the
/// descriptor, which releases the flock. The sibling is never removed, so
/// every holder locks the same inode.
#[derive(Debug)]
pub struct FileLock {
    _handle: File,
    lock_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open {
        path: PathBuf,
        source: io::Error,
    },
    #[error("recent list {path} is busy: another mru process holds the lock")]
    Busy { path: PathBuf },
}

/// The lock file used for `store_path` (`recent.toml` → `recent.toml.lock`).
pub fn lock_path_for(store_path: &Path) -> PathBuf {
    let mut name = store_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    store_path.with_file_name(name)
}

impl FileLock {
    /// Lock `store_path`, polling until `timeout` has passed.
    pub fn acquire(store_path: &Path, timeout: Duration) -> Result<Self, LockError> {
        let lock_path = lock_path_for(store_path);
        let handle = open_lock_file(&lock_path).map_err(|source| LockError::Open {
            path: lock_path.clone(),
            source,
        })?;

        let deadline = Instant::now() + timeout;
        while !try_flock(&handle) {
            if Instant::now() >= deadline {
                return Err(LockError::Busy {
                    path: store_path.to_path_buf(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
        trace!(path = %lock_path.display(), "acquired store lock");
        Ok(FileLock {
            _handle: handle,
            lock_path,
        })
    }

    pub fn acquire_default(store_path: &Path) -> Result<Self, LockError> {
        Self::acquire(store_path, DEFAULT_LOCK_TIMEOUT)
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        trace!(path = %self.lock_path.display(), "releasing store lock");
    }
}

fn open_lock_file(lock_path: &Path) -> io::Result<File> {
    if let Some(dir) = lock_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(lock_path)
}

/// Non-blocking exclusive flock; `false` while another descriptor holds it.
#[cfg(unix)]
fn try_flock(file: &File) -> bool {
    use std::os::unix::io::AsRawFd;
    // SAFETY: the descriptor is owned by `file` and stays open for the call.
    unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) == 0 }
}

#[cfg(not(unix))]
fn try_flock(_file: &File) -> bool {
    true
}
