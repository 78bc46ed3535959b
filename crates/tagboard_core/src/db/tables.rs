//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// Every index namespace (`message~`, `tagged~`, `feed~`) lives in this one
/// ordered table; values are bincode-encoded `Message` rows.
pub const ENTRIES: TableDefinition<&str, &[u8]> = TableDefinition::new("entries");

/// Opaque sessions (`Session`, bincode-encoded), stored in the sessions file.
pub const SESSIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");
