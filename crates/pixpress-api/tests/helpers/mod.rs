//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p pixpress-api`.

pub mod fixtures;

use axum_test::TestServer;
use pixpress_api::setup::routes;
use pixpress_api::state::AppState;
use pixpress_core::Config;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub const INDEX_HTML: &str = "<!doctype html><title>pixpress test</title>";

/// Test application: server, state, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub _static_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Default configuration pointed at `static_dir`.
pub fn test_config(static_dir: &Path) -> Config {
    Config {
        static_dir: static_dir.to_path_buf(),
        ..Config::default()
    }
}

/// Static directory holding an `index.html` and one asset.
pub fn static_dir_with_index() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("index.html"), INDEX_HTML).expect("write index.html");
    std::fs::write(dir.path().join("app.js"), "console.log('ok');").expect("write app.js");
    dir
}

/// Setup test app with default limits and a populated static dir.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with(static_dir_with_index(), |_| {}, |config| {
        Arc::new(AppState::new(config))
    })
}

/// Setup test app from a static dir, a config tweak and a state builder.
pub fn setup_test_app_with(
    static_dir: TempDir,
    tweak: impl FnOnce(&mut Config),
    build_state: impl FnOnce(Config) -> Arc<AppState>,
) -> TestApp {
    let mut config = test_config(static_dir.path());
    tweak(&mut config);

    let state = build_state(config.clone());
    let app = routes::setup_routes(&config, state.clone());
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        state,
        _static_dir: static_dir,
    }
}
