//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use std::path::Path;
use tagboard_server::{create_app, AppState, Config};
use tempfile::TempDir;

pub(crate) fn test_config_for_db_path(db_path: &Path) -> Config {
    Config {
        port: 0,
        db_path: db_path.to_str().expect("db path").to_string(),
        max_message_size: 4096,
        static_dir: db_path.join("public").to_str().expect("static dir").to_string(),
        session_secret: None,
    }
}

pub(crate) fn test_server_for_config(config: Config) -> (TestServer, AppState) {
    let state = AppState::open(config).expect("open state");
    let app = create_app(state.clone());
    let server = TestServer::new(app).expect("server");
    (server, state)
}

pub(crate) fn setup_test_server() -> (TestServer, TempDir, AppState) {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = test_config_for_db_path(temp_dir.path());
    let (server, state) = test_server_for_config(config);
    (server, temp_dir, state)
}
