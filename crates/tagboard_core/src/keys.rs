//! Sorted-key namespaces for the message store.
//!
//! One physical table holds three logical indexes, partitioned by key prefix:
//!
//! - `message~<id>~<created>`: primary record
//! - `tagged~<tag>~<id>~<created>`: one entry per distinct tag
//! - `feed~<created>~<id prefix>`: recency index
//!
//! Timestamps are zero-padded so lexicographic order matches numeric order.

use std::fmt;
use thiserror::Error;

/// Reserved component separator.
pub const SEPARATOR: char = '~';

/// Appended to a prefix to form the exclusive upper bound of a range scan.
pub const RANGE_END_SUFFIX: char = char::MAX;

/// Number of id characters carried by feed keys.
pub const FEED_ID_PREFIX_LEN: usize = 8;

const TIMESTAMP_WIDTH: usize = 20;

/// Key encoding/decoding failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("{component} must not be empty")]
    EmptyComponent { component: &'static str },

    #[error("{component} must not contain '~': {value:?}")]
    ReservedSeparator {
        component: &'static str,
        value: String,
    },

    #[error("unknown namespace in key {0:?}")]
    UnknownNamespace(String),

    #[error("malformed key {0:?}")]
    Malformed(String),
}

/// Logical index partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Message,
    Tagged,
    Feed,
}

impl Namespace {
    /// Prefix token without the trailing separator.
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Message => "message",
            Namespace::Tagged => "tagged",
            Namespace::Feed => "feed",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "message" => Some(Namespace::Message),
            "tagged" => Some(Namespace::Tagged),
            "feed" => Some(Namespace::Feed),
            _ => None,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured form of every key stored in the entries table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexKey {
    Message { id: String, created: u64 },
    Tagged { tag: String, id: String, created: u64 },
    Feed { created: u64, id_prefix: String },
}

fn check_component(component: &'static str, value: &str) -> Result<(), KeyError> {
    if value.is_empty() {
        return Err(KeyError::EmptyComponent { component });
    }
    if value.contains(SEPARATOR) {
        return Err(KeyError::ReservedSeparator {
            component,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn encode_timestamp(created: u64) -> String {
    format!("{:0width$}", created, width = TIMESTAMP_WIDTH)
}

fn decode_timestamp(key: &str, value: &str) -> Result<u64, KeyError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(KeyError::Malformed(key.to_string()));
    }
    value
        .parse()
        .map_err(|_| KeyError::Malformed(key.to_string()))
}

impl IndexKey {
    /// Primary record key.
    pub fn message(id: impl Into<String>, created: u64) -> Self {
        IndexKey::Message {
            id: id.into(),
            created,
        }
    }

    /// Tag index key.
    pub fn tagged(tag: impl Into<String>, id: impl Into<String>, created: u64) -> Self {
        IndexKey::Tagged {
            tag: tag.into(),
            id: id.into(),
            created,
        }
    }

    /// Feed key; only the first [`FEED_ID_PREFIX_LEN`] characters of `id` are kept.
    pub fn feed(created: u64, id: &str) -> Self {
        IndexKey::Feed {
            created,
            id_prefix: id.chars().take(FEED_ID_PREFIX_LEN).collect(),
        }
    }

    pub fn namespace(&self) -> Namespace {
        match self {
            IndexKey::Message { .. } => Namespace::Message,
            IndexKey::Tagged { .. } => Namespace::Tagged,
            IndexKey::Feed { .. } => Namespace::Feed,
        }
    }

    /// Encode into the sortable string form.
    ///
    /// # Errors
    /// Returns [`KeyError`] when a component is empty or contains [`SEPARATOR`].
    pub fn encode(&self) -> Result<String, KeyError> {
        let ns = self.namespace();
        match self {
            IndexKey::Message { id, created } => {
                check_component("id", id)?;
                Ok(format!(
                    "{ns}{SEPARATOR}{id}{SEPARATOR}{}",
                    encode_timestamp(*created)
                ))
            }
            IndexKey::Tagged { tag, id, created } => {
                check_component("tag", tag)?;
                check_component("id", id)?;
                Ok(format!(
                    "{ns}{SEPARATOR}{tag}{SEPARATOR}{id}{SEPARATOR}{}",
                    encode_timestamp(*created)
                ))
            }
            IndexKey::Feed { created, id_prefix } => {
                check_component("id prefix", id_prefix)?;
                Ok(format!(
                    "{ns}{SEPARATOR}{}{SEPARATOR}{id_prefix}",
                    encode_timestamp(*created)
                ))
            }
        }
    }

    /// Parse a stored key back into its structured form.
    ///
    /// # Errors
    /// Returns [`KeyError`] for unknown namespaces or wrong component counts.
    pub fn decode(key: &str) -> Result<Self, KeyError> {
        let parts: Vec<&str> = key.split(SEPARATOR).collect();
        let ns = Namespace::parse(parts[0])
            .ok_or_else(|| KeyError::UnknownNamespace(key.to_string()))?;
        let malformed = || KeyError::Malformed(key.to_string());

        match (ns, parts.as_slice()) {
            (Namespace::Message, [_, id, created]) if !id.is_empty() => Ok(IndexKey::Message {
                id: id.to_string(),
                created: decode_timestamp(key, created)?,
            }),
            (Namespace::Tagged, [_, tag, id, created]) if !tag.is_empty() && !id.is_empty() => {
                Ok(IndexKey::Tagged {
                    tag: tag.to_string(),
                    id: id.to_string(),
                    created: decode_timestamp(key, created)?,
                })
            }
            (Namespace::Feed, [_, created, id_prefix]) if !id_prefix.is_empty() => {
                Ok(IndexKey::Feed {
                    created: decode_timestamp(key, created)?,
                    id_prefix: id_prefix.to_string(),
                })
            }
            _ => Err(malformed()),
        }
    }
}

/// Half-open `[start, end)` bounds for a prefix scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRange {
    pub start: String,
    pub end: String,
}

impl KeyRange {
    fn prefixed(prefix: String) -> Self {
        let mut end = prefix.clone();
        end.push(RANGE_END_SUFFIX);
        Self { start: prefix, end }
    }

    /// Every key in `ns`.
    pub fn namespace(ns: Namespace) -> Self {
        Self::prefixed(format!("{ns}{SEPARATOR}"))
    }

    /// Primary records for one message id.
    pub fn message(id: &str) -> Result<Self, KeyError> {
        check_component("id", id)?;
        Ok(Self::prefixed(format!(
            "{}{SEPARATOR}{id}{SEPARATOR}",
            Namespace::Message
        )))
    }

    /// Tag index entries for one tag.
    pub fn tag(tag: &str) -> Result<Self, KeyError> {
        check_component("tag", tag)?;
        Ok(Self::prefixed(format!(
            "{}{SEPARATOR}{tag}{SEPARATOR}",
            Namespace::Tagged
        )))
    }

    pub fn contains(&self, key: &str) -> bool {
        key >= self.start.as_str() && key < self.end.as_str()
    }
}
