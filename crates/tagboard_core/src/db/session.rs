//! Opaque session storage backed by its own redb file.

use super::tables::SESSIONS;
use crate::{error::AppError, models::session::Session};
use redb::{ReadableDatabase, ReadableTable, ReadableTableMetadata};
use std::sync::Arc;

/// Accessor for the `sessions` table.
pub struct SessionDb {
    db: Arc<redb::Database>,
}

impl SessionDb {
    /// Initialize the sessions table if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(SESSIONS)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Create and persist a fresh session.
    ///
    /// # Errors
    /// Returns an error when serialization or the write fails.
    pub fn create(&self) -> Result<Session, AppError> {
        let session = Session::new();
        let encoded = bincode::serialize(&session)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut sessions = write_txn.open_table(SESSIONS)?;
            sessions.insert(session.id.as_str(), encoded.as_slice())?;
        }
        write_txn.commit()?;
        Ok(session)
    }

    /// Fetch a session by id.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: &str) -> Result<Option<Session>, AppError> {
        let read_txn = self.db.begin_read()?;
        let sessions = read_txn.open_table(SESSIONS)?;
        match sessions.get(id)? {
            Some(value) => Ok(Some(bincode::deserialize(value.value())?)),
            None => Ok(None),
        }
    }

    /// Number of stored sessions.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn count(&self) -> Result<u64, AppError> {
        let read_txn = self.db.begin_read()?;
        let sessions = read_txn.open_table(SESSIONS)?;
        Ok(sessions.len()?)
    }
}
