//! Integration tests for the Tagboard HTTP surface.

mod support;

use axum::http::{header, HeaderValue, StatusCode};
use support::{setup_test_server, test_config_for_db_path, test_server_for_config};
use tagboard_server::keys::Namespace;
use tagboard_server::PAGE_SIZE;
use tempfile::TempDir;

fn assert_redirects_home(response: &axum_test::TestResponse) {
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some("/")
    );
}

#[tokio::test]
async fn post_then_read_home_and_tag_pages() {
    let (server, _temp, state) = setup_test_server();

    let response = server
        .post("/post")
        .form(&[("message", "hello #world"), ("media", "")])
        .await;
    assert_redirects_home(&response);

    let home = server.get("/").await;
    assert_eq!(home.status_code(), StatusCode::OK);
    let body = home.text();
    assert!(body.contains(r#"<a href="/tag/hello">hello</a>"#));
    assert!(body.contains(r#"<a href="/tag/world">#world</a>"#));

    for tag in ["hello", "world", "WORLD"] {
        let page = server.get(&format!("/tag/{}", tag)).await;
        assert_eq!(page.status_code(), StatusCode::OK);
        assert!(page.text().contains("#world</a>"), "tag {}", tag);
    }

    let stored = state.db.messages.list_recent(PAGE_SIZE).expect("list");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].original, "hello #world");
    assert_eq!(stored[0].tags, vec!["hello", "world"]);
}

#[tokio::test]
async fn empty_message_writes_nothing_and_redirects() {
    let (server, _temp, state) = setup_test_server();

    for message in ["", "    ", "\n\t"] {
        let response = server.post("/post").form(&[("message", message)]).await;
        assert_redirects_home(&response);
    }
    let missing_field = server.post("/post").form(&[("media", "")]).await;
    assert_redirects_home(&missing_field);

    for namespace in [Namespace::Message, Namespace::Tagged, Namespace::Feed] {
        assert_eq!(state.db.messages.count(namespace).expect("count"), 0);
    }
}

#[tokio::test]
async fn media_allow_list_is_applied() {
    let (server, _temp, state) = setup_test_server();

    server
        .post("/post")
        .form(&[("message", "good gif"), ("media", "https://media.giphy.com/x.gif")])
        .await;
    server
        .post("/post")
        .form(&[("message", "bad gif"), ("media", "https://evil.com/x.gif")])
        .await;

    let good = state.db.messages.list_by_tag("good", PAGE_SIZE).expect("good");
    let bad = state.db.messages.list_by_tag("bad", PAGE_SIZE).expect("bad");
    assert_eq!(good[0].media, "https://media.giphy.com/x.gif");
    assert_eq!(bad[0].media, "");

    let home = server.get("/").await.text();
    assert!(home.contains(r#"src="https://media.giphy.com/x.gif""#));
    assert!(!home.contains("evil.com"));
}

#[tokio::test]
async fn markup_in_messages_is_escaped() {
    let (server, _temp, _state) = setup_test_server();

    server
        .post("/post")
        .form(&[("message", "<script>alert(\"pwned\")</script>")])
        .await;

    let body = server.get("/").await.text();
    assert!(!body.contains("<script>"));
    assert!(body.contains("&lt;script&gt;alert(&quot;pwned&quot;)&lt;/script&gt;"));
}

#[tokio::test]
async fn home_page_shows_newest_fifty() {
    let (server, _temp, state) = setup_test_server();

    for i in 0..60 {
        server
            .post("/post")
            .form(&[("message", format!("post{}", i))])
            .await;
    }

    let recent = state.db.messages.list_recent(PAGE_SIZE).expect("list");
    assert_eq!(recent.len(), 50);
    assert_eq!(recent[0].original, "post59");
    assert_eq!(recent[49].original, "post10");

    let body = server.get("/").await.text();
    assert_eq!(body.matches("class=\"message\"").count(), 50);
    assert!(body.contains("/tag/post59"));
    assert!(!body.contains("/tag/post9\""));
}

#[tokio::test]
async fn single_message_page() {
    let (server, _temp, state) = setup_test_server();
    server.post("/post").form(&[("message", "permalink me")]).await;
    let id = state.db.messages.list_recent(1).expect("list")[0].id.clone();

    let page = server.get(&format!("/m/{}", id)).await;
    assert_eq!(page.status_code(), StatusCode::OK);
    assert!(page.text().contains("/tag/permalink"));

    let missing = server.get("/m/does-not-exist").await;
    assert_eq!(missing.status_code(), StatusCode::OK);
    assert!(missing.text().contains("No messages yet."));
}

#[tokio::test]
async fn unknown_tag_renders_empty_page() {
    let (server, _temp, _state) = setup_test_server();
    let page = server.get("/tag/nothing-here").await;
    assert_eq!(page.status_code(), StatusCode::OK);
    assert!(page.text().contains("No messages yet."));
}

#[tokio::test]
async fn separator_in_path_is_a_bad_request() {
    let (server, _temp, _state) = setup_test_server();
    let tag = server.get("/tag/a~b").await;
    assert_eq!(tag.status_code(), StatusCode::BAD_REQUEST);
    let message = server.get("/m/a~b").await;
    assert_eq!(message.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_message_is_rejected() {
    let (server, _temp, state) = setup_test_server();
    let huge = "a".repeat(5000);
    let response = server.post("/post").form(&[("message", huge.as_str())]).await;
    assert!(response.status_code().is_client_error());
    assert_eq!(state.db.messages.count(Namespace::Message).expect("count"), 0);
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let (server, _temp, _state) = setup_test_server();
    let response = server.get("/").await;
    let headers = response.headers();
    assert_eq!(
        headers.get(header::X_CONTENT_TYPE_OPTIONS),
        Some(&HeaderValue::from_static("nosniff"))
    );
    assert_eq!(
        headers.get(header::X_FRAME_OPTIONS),
        Some(&HeaderValue::from_static("DENY"))
    );
    assert!(headers.get(header::CONTENT_SECURITY_POLICY).is_some());
}

#[tokio::test]
async fn static_files_are_served_from_static_dir() {
    let temp = TempDir::new().expect("temp dir");
    let config = test_config_for_db_path(temp.path());
    std::fs::create_dir_all(&config.static_dir).expect("static dir");
    std::fs::write(
        std::path::Path::new(&config.static_dir).join("style.css"),
        "body { color: black; }",
    )
    .expect("write css");
    let (server, _state) = test_server_for_config(config);

    let response = server.get("/style.css").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("color: black"));
}

#[tokio::test]
async fn sessions_issue_and_accept_signed_cookies() {
    let temp = TempDir::new().expect("temp dir");
    let mut config = test_config_for_db_path(temp.path());
    config.session_secret = Some("test-secret".to_string());
    let (server, state) = test_server_for_config(config);
    let sessions = state.sessions.clone().expect("sessions enabled");

    let first = server.get("/").await;
    let set_cookie = first
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("session cookie issued")
        .to_string();
    assert!(set_cookie.starts_with("tagboard.sid="));
    assert!(set_cookie.contains("HttpOnly"));
    assert_eq!(sessions.store.count().expect("count"), 1);

    let cookie = set_cookie.split(';').next().expect("cookie pair").to_string();
    let second = server
        .get("/")
        .add_header(header::COOKIE, HeaderValue::from_str(&cookie).expect("cookie"))
        .await;
    assert!(second.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(sessions.store.count().expect("count"), 1);

    let forged = server
        .get("/")
        .add_header(
            header::COOKIE,
            HeaderValue::from_static("tagboard.sid=someone-else.0000"),
        )
        .await;
    assert!(forged.headers().get(header::SET_COOKIE).is_some());
    assert_eq!(sessions.store.count().expect("count"), 2);
}
