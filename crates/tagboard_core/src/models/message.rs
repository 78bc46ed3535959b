//! Message models stored under every index namespace.

use crate::tagger::TaggedMessage;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A posted message. The same payload is stored under the primary, feed, and
/// tag keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub original: String,
    /// HTML fragments, one per whitespace-delimited token.
    pub tagged: Vec<String>,
    /// Distinct non-empty tags in first-seen order.
    pub tags: Vec<String>,
    /// Accepted media URL, or empty.
    pub media: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub created: u64,
}

/// Form payload for `POST /post`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub media: Option<String>,
}

impl Message {
    /// Build a message from tagger output with a freshly minted id.
    pub fn new(tagged: TaggedMessage, created: u64) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), tagged, created)
    }

    /// Build a message from tagger output under an existing id.
    pub fn with_id(id: String, tagged: TaggedMessage, created: u64) -> Self {
        Self {
            id,
            original: tagged.original,
            tagged: tagged.fragments,
            tags: tagged.tags,
            media: tagged.media,
            created,
        }
    }

    pub fn has_media(&self) -> bool {
        !self.media.is_empty()
    }

    /// Tagged fragments joined for display.
    pub fn tagged_html(&self) -> String {
        self.tagged.join(" ")
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(self.created).ok()?;
        Utc.timestamp_millis_opt(millis).single()
    }
}
