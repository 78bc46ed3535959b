//! Server-rendered HTML pages.
//!
//! Tagged fragments are stored pre-escaped; every other dynamic string is
//! escaped here.

use axum::http::StatusCode;
use std::fmt::Write as _;
use tagboard_core::models::message::Message;
use tagboard_core::tagger::escape_html;

/// Which listing a page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind<'a> {
    Home,
    Tag(&'a str),
    Single(&'a str),
}

const POST_FORM: &str = r#"<form class="compose" method="post" action="/post">
  <textarea name="message" rows="3" placeholder="Say something, every word is a tag" required></textarea>
  <input type="url" name="media" placeholder="https://media.giphy.com/...">
  <button type="submit">Post</button>
</form>"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <link rel="stylesheet" href="/style.css">
</head>
<body>
  <header><a class="home" href="/">tagboard</a></header>
  <main>
{body}
  </main>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

fn message_item(out: &mut String, message: &Message) {
    let _ = write!(
        out,
        r#"<li class="message"><p class="tagged">{}</p>"#,
        message.tagged_html()
    );
    if message.has_media() {
        let _ = write!(
            out,
            r#"<img class="media" src="{}" alt="" loading="lazy">"#,
            escape_html(&message.media)
        );
    }
    let created = message
        .created_at()
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_default();
    let _ = write!(
        out,
        r#"<a class="permalink" href="/m/{}">{}</a></li>"#,
        escape_html(&message.id),
        escape_html(&created)
    );
    out.push('\n');
}

/// Render a listing page with the post form.
pub fn board_page(kind: PageKind<'_>, messages: &[Message]) -> String {
    let (title, heading) = match kind {
        PageKind::Home => ("tagboard".to_string(), String::new()),
        PageKind::Tag(tag) => (
            format!("#{tag} - tagboard"),
            format!(r#"<h1 class="tag">#{}</h1>"#, escape_html(tag)),
        ),
        PageKind::Single(id) => (
            "message - tagboard".to_string(),
            format!(r#"<h1 class="single">message {}</h1>"#, escape_html(id)),
        ),
    };

    let mut body = String::new();
    body.push_str(POST_FORM);
    body.push('\n');
    body.push_str(&heading);

    if messages.is_empty() {
        body.push_str(r#"<p class="empty">No messages yet.</p>"#);
    } else {
        body.push_str("<ul class=\"messages\">\n");
        for message in messages {
            message_item(&mut body, message);
        }
        body.push_str("</ul>");
    }

    layout(&title, &body)
}

/// Render an error page.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"<h1 class="error">{}</h1><p>{}</p><p><a href="/">Back to the board</a></p>"#,
        status.as_u16(),
        escape_html(message)
    );
    layout(status.canonical_reason().unwrap_or("Error"), &body)
}
