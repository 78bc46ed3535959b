//! Shared test-only helpers for tagboard_core.

use crate::models::message::Message;
use crate::tagger::tag_message;
use crate::Database;
use tempfile::TempDir;

/// Creates an isolated temporary database and returns it with the temp dir.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing files.
pub(crate) fn setup_temp_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let db = Database::new(db_path.to_str().expect("db path")).expect("db");
    (db, temp_dir)
}

/// Tag and store `text`, panicking on any failure.
pub(crate) fn post(db: &Database, text: &str) -> Message {
    let tagged = tag_message(text, None).expect("tag message");
    db.messages.create(tagged).expect("create message")
}
