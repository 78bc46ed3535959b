//! Shared constants used across Tagboard crates.

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default maximum accepted request body / message size in bytes.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// Number of messages returned by every list query.
pub const PAGE_SIZE: usize = 50;

/// Default directory holding the redb files.
pub const DEFAULT_DB_PATH: &str = "./db";

/// Default directory served for static assets.
pub const DEFAULT_STATIC_DIR: &str = "public";

/// redb file holding the message namespaces.
pub const MESSAGES_FILE_NAME: &str = "messages.redb";
/// redb file holding opaque sessions.
pub const SESSIONS_FILE_NAME: &str = "sessions.redb";

/// Cookie carrying the signed session id.
pub const SESSION_COOKIE_NAME: &str = "tagboard.sid";
