//! Shared setup for router-level tests.

use agora_portal::config::Config;
use agora_portal::handlers;
use agora_portal::state::AppState;
use axum::http::StatusCode;
use axum_extra::extract::cookie::Cookie;
use axum_test::TestServer;
use serde_json::json;
use tempfile::TempDir;

pub const DEMO_PASSWORD: &str = "123456";
pub const ADMIN_EMAIL: &str = "admin@agora.edu";
pub const JOAO_EMAIL: &str = "joao@email.com";
pub const MARIA_EMAIL: &str = "maria@email.com";
pub const PEDRO_EMAIL: &str = "pedro@email.com";

/// Seeded portal served from memory, with its session slot in a temp dir.
pub struct TestEnv {
    /// Kept alive so the slot file outlives the test body
    pub temp: TempDir,
    pub state: AppState,
    pub server: TestServer,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let temp = TempDir::new().unwrap();
        let mut config = Config {
            slot_path: temp.path().join("session.json"),
            ..Config::default()
        };
        adjust(&mut config);

        let state = AppState::bootstrap(config).unwrap();
        let server = TestServer::new(handlers::router(state.clone())).unwrap();
        Self {
            temp,
            state,
            server,
        }
    }

    /// Log in and return the session cookie
    pub async fn login(&self, email: &str) -> Cookie<'static> {
        let response = self
            .server
            .post("/login")
            .json(&json!({ "email": email, "password": DEMO_PASSWORD }))
            .await;
        response.assert_status(StatusCode::OK);
        response.cookie("agora_session")
    }
}
