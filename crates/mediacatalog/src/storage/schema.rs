//! `SQLite` schema definitions for mediacatalog.
//!
//! This module contains the SQL statements for creating the catalog tables
//! and the fixed insert statement.

/// SQL statement to create the files table.
pub const CREATE_FILES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS files (
    path TEXT NOT NULL PRIMARY KEY,
    fps INTEGER,
    start_time INTEGER,
    end_time INTEGER,
    time_long INTEGER,
    size INTEGER,
    width INTEGER,
    height INTEGER,
    type TEXT,
    uuid TEXT,
    gps TEXT
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_FILES_TABLE, CREATE_METADATA_TABLE];

/// Insert one record into the files table, bound by named parameter.
pub const INSERT_FILE: &str = r"
INSERT INTO files VALUES (
    @path, @fps, @start_time, @end_time, @time_long,
    @size, @width, @height, @type, @uuid, @gps
)
";
