//! Application configuration.
//!
//! Every value is resolved with priority: config.toml > environment (.env) >
//! built-in default.

use chrono::TimeDelta;
use serde::Deserialize;
use std::fmt::Display;
use std::path::PathBuf;

// ==================== Defaults ====================

/// Server address to bind to
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Session expiration time in hours of inactivity (1 week)
pub const DEFAULT_SESSION_EXPIRY_HOURS: i64 = 24 * 7;

/// Single key-value slot caching the logged-in user
pub const DEFAULT_SLOT_PATH: &str = "data/session.json";

/// Shared password of the fixture accounts
pub const DEFAULT_DEMO_PASSWORD: &str = "123456";

/// Maximum video upload size in megabytes
pub const DEFAULT_MAX_UPLOAD_MB: usize = 200;

/// Probability threshold for session cleanup (0-255, lower = more frequent)
/// Value of 25 means ~10% chance (25/256) on each session access
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

// ==================== File format ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    server: Option<ServerSection>,
    session: Option<SessionSection>,
    auth: Option<AuthSection>,
    media: Option<MediaSection>,
    catalog: Option<CatalogSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    addr: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct SessionSection {
    expiry_hours: Option<i64>,
    slot_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthSection {
    demo_password: Option<String>,
    login_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct MediaSection {
    max_upload_mb: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogSection {
    seed: Option<bool>,
}

// ==================== Resolved config ====================

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub server_port: u16,
    pub session_expiry_hours: i64,
    pub slot_path: PathBuf,
    pub demo_password: String,
    /// Artificial delay before answering a login attempt
    pub login_delay_ms: u64,
    pub max_upload_bytes: usize,
    /// Load fixture courses, classes and students at startup
    pub seed_catalog: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            session_expiry_hours: DEFAULT_SESSION_EXPIRY_HOURS,
            slot_path: PathBuf::from(DEFAULT_SLOT_PATH),
            demo_password: DEFAULT_DEMO_PASSWORD.to_string(),
            login_delay_ms: 0,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            seed_catalog: true,
        }
    }
}

impl Config {
    /// Load configuration from config.toml and the process environment
    pub fn load() -> Self {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::info!("Using configuration from {}", path);
                Some(contents)
            }
            Err(_) => None,
        };

        Self::from_sources(contents.as_deref(), |key| std::env::var(key).ok())
    }

    /// Resolve configuration from optional TOML contents and an environment lookup
    pub fn from_sources(toml_contents: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Self {
        let file = match toml_contents.map(toml::from_str::<FileConfig>) {
            Some(Ok(file)) => file,
            Some(Err(e)) => {
                tracing::warn!("Ignoring malformed config.toml: {}", e);
                FileConfig::default()
            }
            None => FileConfig::default(),
        };
        let server = file.server.unwrap_or_default();
        let session = file.session.unwrap_or_default();
        let auth = file.auth.unwrap_or_default();
        let media = file.media.unwrap_or_default();
        let catalog = file.catalog.unwrap_or_default();
        let defaults = Config::default();

        let env_parse = |key: &str| env(key).and_then(|v| v.trim().parse().ok());

        Config {
            server_addr: server
                .addr
                .or_else(|| env("AGORA_ADDR"))
                .unwrap_or(defaults.server_addr),
            server_port: server
                .port
                .or_else(|| env_parse("AGORA_PORT").and_then(|p: u64| u16::try_from(p).ok()))
                .unwrap_or(defaults.server_port),
            session_expiry_hours: session
                .expiry_hours
                .or_else(|| env_parse("SESSION_EXPIRY_HOURS").and_then(|h: u64| i64::try_from(h).ok()))
                .filter(|&h| checked(TimeDelta::try_hours(h).is_some(), "session expiry_hours", h))
                .unwrap_or(defaults.session_expiry_hours),
            slot_path: session
                .slot_path
                .or_else(|| env("SESSION_SLOT_PATH"))
                .map(PathBuf::from)
                .unwrap_or(defaults.slot_path),
            demo_password: auth
                .demo_password
                .or_else(|| env("DEMO_PASSWORD"))
                .unwrap_or(defaults.demo_password),
            login_delay_ms: auth
                .login_delay_ms
                .or_else(|| env_parse("LOGIN_DELAY_MS"))
                .unwrap_or(defaults.login_delay_ms),
            max_upload_bytes: media
                .max_upload_mb
                .or_else(|| env_parse("MAX_UPLOAD_MB").map(|mb: u64| mb as usize))
                .and_then(|mb| {
                    let bytes = mb.checked_mul(1024 * 1024);
                    checked(bytes.is_some(), "media max_upload_mb", mb);
                    bytes
                })
                .unwrap_or(defaults.max_upload_bytes),
            seed_catalog: catalog
                .seed
                .or_else(|| env("SEED_CATALOG").map(|v| matches!(v.trim(), "1" | "true" | "yes")))
                .unwrap_or(defaults.seed_catalog),
        }
    }

    /// Get the full server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_addr, self.server_port)
    }
}

/// Warn when a configured value is out of range, so the default applies
fn checked(ok: bool, key: &str, value: impl Display) -> bool {
    if !ok {
        tracing::warn!("{} = {} is out of range, using the default", key, value);
    }
    ok
}
