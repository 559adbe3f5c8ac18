use crate::error::{Result, SortError};
use fs2::FileExt;
use log::info;
use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Delay between lock attempts while another run holds it
pub const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Serializes whole program runs against each other
///
/// The listener may spawn one run per completed study, and studies can
/// complete close together; without this, two runs race on shared ownership
/// side effects.
pub trait RunLock {
    /// Blocks until the lock is held
    fn acquire(&mut self) -> Result<()>;
}

/// Process-wide exclusive advisory lock on a well-known file
///
/// Each attempt re-opens the lock file before trying to lock it, so a lock
/// file deleted or replaced while waiting does not wedge the retry loop on
/// a stale handle. Held until dropped.
pub struct FileRunLock {
    path: PathBuf,
    handle: Option<File>,
}

impl FileRunLock {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            handle: None,
        }
    }

    /// Single non-blocking attempt
    ///
    /// `Ok(false)` means another run holds the lock.
    ///
    /// # Errors
    ///
    /// Returns a lock error if the lock file cannot be opened or created.
    pub fn try_acquire(&mut self) -> Result<bool> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| {
                SortError::Lock(format!("cannot open lock file {}: {}", self.path.display(), e))
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                self.handle = Some(file);
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }
}

impl RunLock for FileRunLock {
    fn acquire(&mut self) -> Result<()> {
        let mut waited = false;
        loop {
            if self.try_acquire()? {
                if waited {
                    info!("lock on {} acquired", self.path.display());
                }
                return Ok(());
            }
            if !waited {
                info!(
                    "another run holds {}, retrying every {:?}",
                    self.path.display(),
                    RETRY_DELAY
                );
                waited = true;
            }
            thread::sleep(RETRY_DELAY);
        }
    }
}

impl Drop for FileRunLock {
    fn drop(&mut self) {
        if let Some(file) = self.handle.take() {
            let _ = file.unlock();
        }
    }
}
