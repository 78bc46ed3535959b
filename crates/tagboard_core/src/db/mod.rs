//! Database layer for Tagboard.
//!
//! Messages live in `<db_path>/messages.redb`; sessions use a separate file,
//! `<db_path>/sessions.redb`, so they can be wiped without touching messages.

/// Message indexing and queries.
pub mod message;
/// Opaque session storage.
pub mod session;
/// Table definitions.
pub mod tables;

mod time_util;

use crate::constants::{MESSAGES_FILE_NAME, SESSIONS_FILE_NAME};
use crate::error::AppError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use message::MessageDb;
pub use session::SessionDb;

/// Database handle for the message namespaces.
pub struct Database {
    pub db: Arc<redb::Database>,
    pub messages: MessageDb,
}

#[cfg(test)]
mod tests;

fn open_redb_file(dir: &str, file_name: &str) -> Result<Arc<redb::Database>, AppError> {
    let dir = Path::new(dir);
    std::fs::create_dir_all(dir).map_err(|err| {
        AppError::StorageMessage(format!(
            "Failed to create database directory {}: {}",
            dir.display(),
            err
        ))
    })?;
    let file: PathBuf = dir.join(file_name);
    let db = redb::Database::create(&file)?;
    tracing::debug!("Opened {}", file.display());
    Ok(Arc::new(db))
}

impl Database {
    /// Open (or create) the message store under `path` and initialize tables.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or redb fails to
    /// open the file.
    pub fn new(path: &str) -> Result<Self, AppError> {
        let db = open_redb_file(path, MESSAGES_FILE_NAME)?;
        Self::from_shared(db)
    }

    /// Build a database handle from an existing shared redb instance.
    ///
    /// # Errors
    /// Returns an error if the required tables cannot be opened.
    pub fn from_shared(db: Arc<redb::Database>) -> Result<Self, AppError> {
        Ok(Self {
            messages: MessageDb::new(db.clone())?,
            db,
        })
    }
}

impl SessionDb {
    /// Open (or create) the session store under `path`.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or redb fails to
    /// open the file.
    pub fn open(path: &str) -> Result<Self, AppError> {
        let db = open_redb_file(path, SESSIONS_FILE_NAME)?;
        Self::new(db)
    }
}
