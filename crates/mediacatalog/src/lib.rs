//! `mediacatalog` - a `SQLite` catalog of media file metadata
//!
//! This library stores one row per media file (path, frame rate, timestamps,
//! duration, size, dimensions, type, identifier and GPS text) in a single
//! table keyed by path, with all access serialized through one lock.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod shared;
pub mod storage;

pub use config::{Config, SynchronousMode};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::FileInfo;
pub use storage::{Catalog, CatalogStats};
