//! Message sanitizing, tag extraction, and tagged HTML rendering.
//!
//! Tokenization is a naive split on Unicode whitespace. Every token becomes a
//! fragment of the tagged rendering, and every token whose normalized form is
//! non-empty becomes a tag.

use crate::error::AppError;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Output of [`tag_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedMessage {
    /// Trimmed input text.
    pub original: String,
    /// One HTML-safe fragment per token, in input order.
    pub fragments: Vec<String>,
    /// Distinct non-empty tags in first-seen order.
    pub tags: Vec<String>,
    /// Accepted media URL, or empty.
    pub media: String,
}

fn media_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^https://\w*\.giphy\.com").expect("media allow-list pattern is valid")
    })
}

/// Strip every character outside `[A-Za-z0-9_-]` and lowercase the rest.
///
/// Applying it twice yields the same result as applying it once.
pub fn normalize_tag(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Normalize a tag taken from a request path before it is looked up.
pub fn normalize_tag_query(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Escape text for inclusion in HTML content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render one token as an HTML fragment.
///
/// URL-looking tokens become outbound links, tokens with a non-empty tag link
/// to the tag page, and everything else is plain escaped text.
pub fn render_token(token: &str) -> String {
    let text = escape_html(token);
    if text.starts_with("http") {
        return format!(
            "<a class=\"outbound\" href=\"{text}\" rel=\"nofollow noopener\" target=\"_blank\">{text}</a>"
        );
    }

    let tag = normalize_tag(token);
    if tag.is_empty() {
        format!("<span class=\"plain\">{text}</span>")
    } else {
        format!("<a href=\"/tag/{}\">{text}</a>", urlencoding::encode(&tag))
    }
}

/// Keep `media` only when it points at an allow-listed giphy host.
///
/// Rejected URLs are dropped silently.
pub fn accept_media(media: Option<&str>) -> String {
    let Some(media) = media.map(str::trim).filter(|m| !m.is_empty()) else {
        return String::new();
    };
    if media_pattern().is_match(media) {
        media.to_string()
    } else {
        tracing::debug!("Discarding media URL outside the allow-list: {}", media);
        String::new()
    }
}

/// Sanitize and tag a raw message.
///
/// # Returns
/// The trimmed original, per-token fragments, distinct tags, and accepted media.
///
/// # Errors
/// Returns [`AppError::EmptyMessage`] when `raw` is empty after trimming.
pub fn tag_message(raw: &str, media: Option<&str>) -> Result<TaggedMessage, AppError> {
    let original = raw.trim();
    if original.is_empty() {
        return Err(AppError::EmptyMessage);
    }

    let mut fragments = Vec::new();
    let mut tags = Vec::new();
    let mut seen = HashSet::new();
    for token in original.split_whitespace() {
        fragments.push(render_token(token));
        let tag = normalize_tag(token);
        if !tag.is_empty() && seen.insert(tag.clone()) {
            tags.push(tag);
        }
    }

    Ok(TaggedMessage {
        original: original.to_string(),
        fragments,
        tags,
        media: accept_media(media),
    })
}

#[cfg(test)]
mod tests;
