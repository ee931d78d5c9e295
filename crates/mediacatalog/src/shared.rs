//! Process-wide catalog handle.
//!
//! For programs that want one database for the whole process without
//! threading a [`Catalog`] through their call graph. [`init`] opens it once,
//! [`add_file`] inserts through it and [`release`] closes it again.
//! [`run_demo`] runs that whole sequence with the built-in sample record.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::config::{Config, SynchronousMode};
use crate::error::{Error, Result};
use crate::record::FileInfo;
use crate::storage::Catalog;

static SHARED: Mutex<Option<Catalog>> = Mutex::new(None);

fn slot() -> Result<MutexGuard<'static, Option<Catalog>>> {
    SHARED
        .lock()
        .map_err(|_| Error::internal("shared catalog lock poisoned"))
}

/// Open the process-wide catalog at `path`.
///
/// Calling this again while a catalog is open logs a warning and keeps the
/// existing one.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
pub fn init(path: impl AsRef<Path>, synchronous: SynchronousMode) -> Result<()> {
    let mut slot = slot()?;
    if let Some(existing) = slot.as_ref() {
        warn!(
            "Shared catalog already initialized at {}",
            existing.path().display()
        );
        return Ok(());
    }
    *slot = Some(Catalog::open(path, synchronous)?);
    Ok(())
}

/// Open the process-wide catalog from the storage section of `config`.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
pub fn init_from_config(config: &Config) -> Result<()> {
    init(config.database_path(), config.storage.synchronous)
}

/// Insert a record through the process-wide catalog.
///
/// # Errors
///
/// Returns [`Error::NotInitialized`] before [`init`], otherwise the errors of
/// [`Catalog::add_file`].
pub fn add_file(file: &FileInfo) -> Result<()> {
    let slot = slot()?;
    slot.as_ref().ok_or(Error::NotInitialized)?.add_file(file)
}

/// Close the process-wide catalog. Does nothing if none is open.
///
/// # Errors
///
/// Returns an error if the connection fails to close.
pub fn release() -> Result<()> {
    let catalog = slot()?.take();
    match catalog {
        Some(catalog) => catalog.close(),
        None => {
            debug!("Shared catalog release requested but none is open");
            Ok(())
        }
    }
}

/// Whether the process-wide catalog is currently open.
#[must_use]
pub fn is_initialized() -> bool {
    slot().is_ok_and(|slot| slot.is_some())
}

/// Open the shared catalog, insert [`FileInfo::sample`] and release it.
///
/// The catalog is released even when the insert fails. If both fail, the
/// insert error is returned and the release error is logged.
///
/// # Errors
///
/// Returns an error if the database cannot be opened, the sample record is
/// already cataloged, or the connection fails to close.
pub fn run_demo(config: &Config, now: DateTime<Utc>) -> Result<FileInfo> {
    init_from_config(config)?;

    let file = FileInfo::sample(now);
    let added = add_file(&file);
    let released = release();

    match (added, released) {
        (Ok(()), Ok(())) => {
            info!(
                "Added sample record {} to {}",
                file.path,
                config.database_path().display()
            );
            Ok(file)
        }
        (Err(err), Ok(())) | (Ok(()), Err(err)) => Err(err),
        (Err(err), Err(release_err)) => {
            error!("Releasing shared catalog failed: {}", release_err);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests here share the process-wide handle and must not overlap.
    static SERIAL: Mutex<()> = Mutex::new(());

    fn serial() -> MutexGuard<'static, ()> {
        SERIAL.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    #[test]
    fn test_run_demo_twice_is_duplicate() {
        let _guard = serial();
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.database_path = Some(dir.path().join("demo/db.db"));

        let file = run_demo(&config, Utc::now()).unwrap();
        assert_eq!(file.path, "test");
        assert!(!is_initialized());

        let err = run_demo(&config, Utc::now()).unwrap_err();
        assert!(err.is_duplicate());
        assert!(!is_initialized());

        let stats = Catalog::stats_at(config.database_path()).unwrap();
        assert_eq!(stats.total_files, 1);
    }

    #[test]
    fn test_run_demo_open_failure_leaves_nothing_open() {
        let _guard = serial();
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let mut config = Config::default();
        config.storage.database_path = Some(blocker.join("db.db"));

        let err = run_demo(&config, Utc::now()).unwrap_err();
        assert!(matches!(err, Error::DatabaseOpen { .. }));
        assert!(!is_initialized());
    }

    #[test]
    fn test_shared_lifecycle() {
        let _guard = serial();
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.db");
        let second = dir.path().join("second.db");
        let sample = FileInfo::sample(Utc::now());

        assert!(!is_initialized());
        assert!(matches!(add_file(&sample), Err(Error::NotInitialized)));
        release().unwrap();

        init(&first, SynchronousMode::Off).unwrap();
        assert!(is_initialized());

        // Second init keeps the first database.
        init(&second, SynchronousMode::Full).unwrap();
        assert!(!second.exists());

        add_file(&sample).unwrap();
        assert!(add_file(&sample).unwrap_err().is_duplicate());

        release().unwrap();
        assert!(!is_initialized());
        assert!(matches!(add_file(&sample), Err(Error::NotInitialized)));

        let reopened = Catalog::open(&first, SynchronousMode::Off).unwrap();
        assert_eq!(reopened.stats().unwrap().total_files, 1);
    }
}
