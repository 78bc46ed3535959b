//! Message indexing and range queries backed by redb.

use super::tables::ENTRIES;
use super::time_util::MonotonicClock;
use crate::error::AppError;
use crate::keys::{IndexKey, KeyError, KeyRange, Namespace};
use crate::models::message::Message;
use crate::tagger::{normalize_tag_query, tag_message, TaggedMessage};
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;

/// Accessor for the message namespaces in the `entries` table.
pub struct MessageDb {
    db: Arc<redb::Database>,
    clock: MonotonicClock,
}

fn deserialize_message(bytes: &[u8]) -> Result<Message, bincode::Error> {
    bincode::deserialize::<Message>(bytes)
}

/// Every key a message is stored under: primary first, then feed, then one
/// per tag. All share the message's creation timestamp.
fn index_keys(message: &Message) -> Result<Vec<String>, KeyError> {
    let mut keys = Vec::with_capacity(message.tags.len() + 2);
    keys.push(IndexKey::message(message.id.as_str(), message.created).encode()?);
    keys.push(IndexKey::feed(message.created, &message.id).encode()?);
    for tag in &message.tags {
        keys.push(IndexKey::tagged(tag.as_str(), message.id.as_str(), message.created).encode()?);
    }
    Ok(keys)
}

impl MessageDb {
    /// Initialize the entries table if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(ENTRIES)?;
        write_txn.commit()?;
        Ok(Self {
            db,
            clock: MonotonicClock::default(),
        })
    }

    /// Mint an id and timestamp for tagger output and index it.
    ///
    /// # Returns
    /// The stored [`Message`].
    ///
    /// # Errors
    /// Returns an error when the clock, serialization, or the write fails.
    pub fn create(&self, tagged: TaggedMessage) -> Result<Message, AppError> {
        let created = self.clock.next_millis()?;
        let message = Message::new(tagged, created);
        let primary_key = self.index(&message)?;
        tracing::debug!(
            "Indexed message {} under {} tag(s)",
            primary_key,
            message.tags.len()
        );
        Ok(message)
    }

    /// Write the primary, feed, and tag entries for `message` in one
    /// transaction.
    ///
    /// Either every entry becomes visible or none does.
    ///
    /// # Returns
    /// The encoded primary key.
    ///
    /// # Errors
    /// Returns an error when a key component is invalid, serialization fails,
    /// or the transaction cannot commit.
    pub fn index(&self, message: &Message) -> Result<String, AppError> {
        let keys = index_keys(message)?;
        let encoded = bincode::serialize(message)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut entries = write_txn.open_table(ENTRIES)?;
            for key in &keys {
                entries.insert(key.as_str(), encoded.as_slice())?;
            }
        }
        write_txn.commit()?;

        Ok(keys.into_iter().next().unwrap_or_default())
    }

    /// Re-run the tagger over a stored message and rewrite its entries.
    ///
    /// The original creation timestamp is kept, so every key except tag
    /// entries for tags that are no longer derived stays the same; those are
    /// removed. Running it twice leaves the store unchanged.
    ///
    /// # Returns
    /// `Ok(Some(message))` with the re-derived payload, `Ok(None)` when no
    /// message has `id`.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn reindex(&self, id: &str) -> Result<Option<Message>, AppError> {
        let range = KeyRange::message(id)?;

        let write_txn = self.db.begin_write()?;
        let rebuilt = {
            let mut entries = write_txn.open_table(ENTRIES)?;

            let stored = {
                let mut rows = entries.range(range.start.as_str()..range.end.as_str())?;
                match rows.next() {
                    Some(row) => {
                        let (_, value) = row?;
                        deserialize_message(value.value())?
                    }
                    None => return Ok(None),
                }
            };

            let media = (!stored.media.is_empty()).then_some(stored.media.as_str());
            let tagged = tag_message(&stored.original, media)?;
            let rebuilt = Message::with_id(stored.id.clone(), tagged, stored.created);

            let new_keys = index_keys(&rebuilt)?;
            for old_key in index_keys(&stored)? {
                if !new_keys.contains(&old_key) {
                    let _ = entries.remove(old_key.as_str())?;
                }
            }

            let encoded = bincode::serialize(&rebuilt)?;
            for key in &new_keys {
                entries.insert(key.as_str(), encoded.as_slice())?;
            }
            rebuilt
        };
        write_txn.commit()?;

        Ok(Some(rebuilt))
    }

    /// Re-index every stored message.
    ///
    /// # Returns
    /// Number of messages rewritten.
    ///
    /// # Errors
    /// Returns the first storage error encountered.
    pub fn reindex_all(&self) -> Result<usize, AppError> {
        let ids = self.message_ids()?;
        let mut count = 0;
        for id in ids {
            if self.reindex(&id)?.is_some() {
                count += 1;
            }
        }
        Ok(count)
    }

    fn message_ids(&self) -> Result<Vec<String>, AppError> {
        let range = KeyRange::namespace(Namespace::Message);
        let read_txn = self.db.begin_read()?;
        let entries = read_txn.open_table(ENTRIES)?;
        let mut ids = Vec::new();
        for item in entries.range(range.start.as_str()..range.end.as_str())? {
            let (key, _) = item?;
            if let IndexKey::Message { id, .. } = IndexKey::decode(key.value())? {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    /// Fetch a message by id.
    ///
    /// # Returns
    /// `Ok(Some(message))` when found, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when `id` is not a valid key component or storage
    /// access fails.
    pub fn get(&self, id: &str) -> Result<Option<Message>, AppError> {
        let range = KeyRange::message(id)?;
        Ok(self.scan(&range, 1, false)?.into_iter().next())
    }

    /// List the newest messages, newest first.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn list_recent(&self, limit: usize) -> Result<Vec<Message>, AppError> {
        self.scan(&KeyRange::namespace(Namespace::Feed), limit, true)
    }

    /// List messages carrying `tag`, in tag-index key order.
    ///
    /// The tag is trimmed and lowercased first; an empty tag matches nothing.
    ///
    /// # Errors
    /// Returns an error when the tag contains the key separator or storage
    /// access fails.
    pub fn list_by_tag(&self, tag: &str, limit: usize) -> Result<Vec<Message>, AppError> {
        let tag = normalize_tag_query(tag);
        if tag.is_empty() {
            return Ok(Vec::new());
        }
        self.scan(&KeyRange::tag(&tag)?, limit, false)
    }

    /// Number of entries stored in `namespace`.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn count(&self, namespace: Namespace) -> Result<usize, AppError> {
        let range = KeyRange::namespace(namespace);
        let read_txn = self.db.begin_read()?;
        let entries = read_txn.open_table(ENTRIES)?;
        let mut count = 0;
        for item in entries.range(range.start.as_str()..range.end.as_str())? {
            item?;
            count += 1;
        }
        Ok(count)
    }

    fn scan(&self, range: &KeyRange, limit: usize, reverse: bool) -> Result<Vec<Message>, AppError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let read_txn = self.db.begin_read()?;
        let entries = read_txn.open_table(ENTRIES)?;
        let rows = entries.range(range.start.as_str()..range.end.as_str())?;
        let rows: Vec<_> = if reverse {
            rows.rev().take(limit).collect()
        } else {
            rows.take(limit).collect()
        };

        let mut messages = Vec::with_capacity(rows.len());
        for row in rows {
            let (_, value) = row?;
            messages.push(deserialize_message(value.value())?);
        }
        Ok(messages)
    }
}
