use super::*;

#[test]
fn hello_world_yields_both_tags() {
    let tagged = tag_message("  hello #world  ", None).expect("tagged");
    assert_eq!(tagged.original, "hello #world");
    assert_eq!(tagged.tags, vec!["hello", "world"]);
    assert_eq!(
        tagged.fragments,
        vec![
            "<a href=\"/tag/hello\">hello</a>".to_string(),
            "<a href=\"/tag/world\">#world</a>".to_string(),
        ]
    );
    assert_eq!(tagged.media, "");
}

#[test]
fn empty_and_whitespace_messages_are_rejected() {
    for raw in ["", "   ", "\n\t "] {
        assert!(
            matches!(tag_message(raw, None), Err(AppError::EmptyMessage)),
            "raw: {:?}",
            raw
        );
    }
}

#[test]
fn normalize_tag_strips_and_lowercases() {
    assert_eq!(normalize_tag("#Rust-Lang_2024!"), "rust-lang_2024");
    assert_eq!(normalize_tag("!!!"), "");
    assert_eq!(normalize_tag("héllo"), "hllo");
}

#[test]
fn normalize_tag_is_idempotent() {
    for token in ["#Hello", "a<b>c", "MiXeD_case-", "😀", "http://x.y/z?q=1"] {
        let once = normalize_tag(token);
        assert_eq!(normalize_tag(&once), once, "token: {}", token);
    }
}

#[test]
fn rendering_never_leaks_markup() {
    let tagged = tag_message("<script>alert(\"x\")</script> <b>bold</b> \"quoted\"", None)
        .expect("tagged");
    for fragment in &tagged.fragments {
        let inner = fragment
            .split_once('>')
            .and_then(|(_, rest)| rest.rsplit_once("</"))
            .map(|(text, _)| text)
            .expect("fragment has element content");
        assert!(!inner.contains('<'), "fragment: {}", fragment);
        assert!(!inner.contains('>'), "fragment: {}", fragment);
        assert!(!inner.contains('"'), "fragment: {}", fragment);
    }
    assert!(tagged.fragments[0].contains("&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"));
}

#[test]
fn tokens_without_tag_render_as_plain_text() {
    let tagged = tag_message("so ... good", None).expect("tagged");
    assert_eq!(tagged.fragments[1], "<span class=\"plain\">...</span>");
    assert_eq!(tagged.tags, vec!["so", "good"]);
}

#[test]
fn url_tokens_render_as_outbound_links() {
    let fragment = render_token("https://example.com/a?b=1&c=2");
    assert!(fragment.starts_with("<a class=\"outbound\""));
    assert!(fragment.contains("href=\"https://example.com/a?b=1&amp;c=2\""));
}

#[test]
fn duplicate_tags_are_indexed_once() {
    let tagged = tag_message("rust Rust #rust go", None).expect("tagged");
    assert_eq!(tagged.tags, vec!["rust", "go"]);
    assert_eq!(tagged.fragments.len(), 4);
}

#[test]
fn media_allow_list() {
    assert_eq!(
        accept_media(Some("https://media.giphy.com/x.gif")),
        "https://media.giphy.com/x.gif"
    );
    assert_eq!(
        accept_media(Some(" HTTPS://i.GIPHY.com/y.gif ")),
        "HTTPS://i.GIPHY.com/y.gif"
    );
    assert_eq!(accept_media(Some("https://evil.com/x.gif")), "");
    assert_eq!(accept_media(Some("http://media.giphy.com/x.gif")), "");
    assert_eq!(accept_media(Some("https://giphy.com.evil.com/x.gif")), "");
    assert_eq!(accept_media(None), "");
}

#[test]
fn tag_query_is_trimmed_and_lowercased() {
    assert_eq!(normalize_tag_query("  RuSt "), "rust");
}
