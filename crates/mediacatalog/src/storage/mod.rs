//! Storage layer for mediacatalog.
//!
//! This module provides `SQLite`-based persistent storage for media file
//! metadata. All access to a database goes through one [`Catalog`], which
//! serializes callers on a single lock around its connection.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, TryLockError};

use rusqlite::{types::ToSql, Connection, ErrorCode, OpenFlags, Statement};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::{Config, SynchronousMode};
use crate::error::{Error, Result};
use crate::record::FileInfo;

const IN_MEMORY: &str = ":memory:";

/// Storage engine for media file records.
///
/// A `Catalog` owns one connection behind a mutex, so it is `Send + Sync`
/// and can be shared between threads with an `Arc`. Every public operation
/// takes the lock exactly once for its whole duration.
#[derive(Debug)]
pub struct Catalog {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Mutex<Connection>,
}

impl Catalog {
    /// Open or create a catalog database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist,
    /// ensures the `files` table exists, and applies `PRAGMA synchronous`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>, synchronous: SynchronousMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| {
            error!("Failed to open database at {}", path.display());
            Error::DatabaseOpen {
                path: path.clone(),
                source,
            }
        })?;

        let catalog = Self::initialize(path, conn, synchronous)?;
        info!("Database opened successfully at {}", catalog.path.display());
        Ok(catalog)
    }

    /// Create an in-memory catalog, mostly useful for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(IN_MEMORY),
            source,
        })?;

        Self::initialize(PathBuf::from(IN_MEMORY), conn, SynchronousMode::default())
    }

    /// Open the catalog described by the storage section of `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::open(config.database_path(), config.storage.synchronous)
    }

    /// Open an existing catalog without creating or modifying anything.
    ///
    /// No directories or files are created and no schema statements run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseOpen`] if the file is missing or unreadable.
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        debug!("Opening database read-only at {}", path.display());

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&path, flags).map_err(|source| {
            Error::DatabaseOpen {
                path: path.clone(),
                source,
            }
        })?;

        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Statistics for the catalog at `path`, without creating it.
    ///
    /// A database that does not exist yet reports zero files and zero bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing database cannot be read.
    pub fn stats_at(path: impl AsRef<Path>) -> Result<CatalogStats> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No database at {} yet", path.display());
            return Ok(CatalogStats::default());
        }

        let catalog = Self::open_read_only(path)?;
        let stats = catalog.stats()?;
        catalog.close()?;
        Ok(stats)
    }

    fn initialize(path: PathBuf, conn: Connection, synchronous: SynchronousMode) -> Result<Self> {
        migrations::initialize_schema(&conn).inspect_err(|err| {
            error!("Failed to create catalog schema: {}", err);
        })?;

        conn.execute_batch(&format!("PRAGMA synchronous = {}", synchronous.as_sql()))
            .inspect_err(|err| {
                error!("Failed to set PRAGMA synchronous = {}: {}", synchronous, err);
            })?;

        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a record into the catalog, waiting for the lock if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicatePath`] if a record with the same path already
    /// exists, [`Error::Bind`] or [`Error::ValueOutOfRange`] if a field cannot
    /// be bound, or another error if the statement fails.
    pub fn add_file(&self, file: &FileInfo) -> Result<()> {
        let conn = self.lock()?;
        insert_file(&conn, file)
    }

    /// Insert a record only if the catalog lock is free right now.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] when another caller holds the lock, otherwise
    /// the same errors as [`Catalog::add_file`].
    pub fn try_add_file(&self, file: &FileInfo) -> Result<()> {
        let conn = match self.conn.try_lock() {
            Ok(conn) => conn,
            Err(TryLockError::WouldBlock) => {
                debug!("Catalog busy, not inserting {}", file.path);
                return Err(Error::Busy);
            }
            Err(TryLockError::Poisoned(_)) => return Err(poisoned()),
        };
        insert_file(&conn, file)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<CatalogStats> {
        let total_files: i64 = {
            let conn = self.lock()?;
            conn.query_row("SELECT COUNT(*) FROM files", [], |row| row.get(0))?
        };

        let db_size_bytes = if self.path.as_os_str() == IN_MEMORY {
            0
        } else {
            std::fs::metadata(&self.path).map_or(0, |m| m.len())
        };

        Ok(CatalogStats {
            total_files,
            db_size_bytes,
        })
    }

    /// Close the database connection.
    ///
    /// Dropping a `Catalog` also closes it, but silently; this reports the
    /// failure instead.
    ///
    /// # Errors
    ///
    /// Returns an error if `SQLite` refuses to close the connection.
    pub fn close(self) -> Result<()> {
        let conn = self.conn.into_inner().map_err(|_| poisoned())?;
        conn.close().map_err(|(_, source)| {
            error!("Failed to close database at {}", self.path.display());
            Error::DatabaseClose {
                path: self.path.clone(),
                source,
            }
        })?;
        debug!("Closed database at {}", self.path.display());
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| poisoned())
    }
}

/// Statistics about the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    /// Number of records in the `files` table.
    pub total_files: i64,
    /// Size of the database file in bytes (0 for in-memory catalogs).
    pub db_size_bytes: u64,
}

fn poisoned() -> Error {
    Error::internal("catalog lock poisoned")
}

/// Prepare, bind and step the insert for one record. The statement is
/// finalized when it drops, on every path out of this function.
fn insert_file(conn: &Connection, file: &FileInfo) -> Result<()> {
    let mut stmt = conn.prepare(schema::INSERT_FILE).inspect_err(|err| {
        error!("Insert prepare failed: {}", err);
    })?;

    bind_file(&mut stmt, file)?;

    match stmt.raw_execute() {
        Ok(_) => {
            debug!("Cataloged {}", file.path);
            Ok(())
        }
        Err(err) if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) => {
            warn!("File already cataloged: {}", file.path);
            Err(Error::DuplicatePath {
                path: file.path.clone(),
            })
        }
        Err(err) => {
            error!("Insert of {} failed: {}", file.path, err);
            Err(err.into())
        }
    }
}

fn bind_file(stmt: &mut Statement<'_>, file: &FileInfo) -> Result<()> {
    let size = i64::try_from(file.size).map_err(|_| Error::ValueOutOfRange {
        field: "size",
        value: file.size,
    })?;

    bind(stmt, "@path", file.path.as_str())?;
    bind(stmt, "@fps", file.fps)?;
    bind(stmt, "@start_time", file.start_time.timestamp())?;
    bind(stmt, "@end_time", file.end_time.timestamp())?;
    bind(stmt, "@time_long", file.duration_secs)?;
    bind(stmt, "@size", size)?;
    bind(stmt, "@width", file.width)?;
    bind(stmt, "@height", file.height)?;
    bind(stmt, "@type", file.media_type.as_str())?;
    bind(stmt, "@uuid", file.identifier.as_str())?;
    bind(stmt, "@gps", file.gps.as_str())?;
    Ok(())
}

fn bind<T: ToSql>(stmt: &mut Statement<'_>, name: &'static str, value: T) -> Result<()> {
    let index = stmt
        .parameter_index(name)
        .map_err(|source| Error::bind(name, source))?
        .ok_or_else(|| Error::internal(format!("insert statement has no parameter {name}")))?;

    stmt.raw_bind_parameter(index, value).map_err(|source| {
        error!("Bind {} failed: {}", name, source);
        Error::bind(name, source)
    })
}
