//! Application state shared by every handler.

use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::auth::credentials::Credentials;
use crate::auth::password;
use crate::auth::session::SessionStore;
use crate::catalog::{Catalog, seed};
use crate::config::Config;
use crate::error::{ApiError, LogOnError};
use crate::media::MediaStore;
use crate::storage::SessionSlot;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Courses, classes, announcements and accounts
    pub catalog: Arc<RwLock<Catalog>>,
    pub sessions: Arc<Mutex<SessionStore>>,
    pub credentials: Arc<Mutex<Credentials>>,
    /// Uploaded class videos (in memory only)
    pub media: Arc<Mutex<MediaStore>>,
    pub slot: SessionSlot,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(catalog: Catalog, credentials: Credentials, config: Config) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
            sessions: Arc::new(Mutex::new(SessionStore::new(config.session_expiry_hours))),
            credentials: Arc::new(Mutex::new(credentials)),
            media: Arc::new(Mutex::new(MediaStore::new(config.max_upload_bytes))),
            slot: SessionSlot::new(config.slot_path.clone()),
            config: Arc::new(config),
        }
    }

    /// Build the startup state: load the catalog, give every seeded account
    /// the demo password and restore the saved session if its user still exists.
    pub fn bootstrap(config: Config) -> Result<Self, argon2::password_hash::Error> {
        let catalog = if config.seed_catalog {
            seed::fixture_catalog()
        } else {
            seed::empty_catalog()
        };

        // One hash shared by all fixture accounts keeps startup fast
        let hash = password::hash_password(&config.demo_password)?;
        let credentials = Credentials::with_shared_hash(
            catalog
                .admins()
                .iter()
                .chain(catalog.students())
                .map(|u| u.id.as_str()),
            &hash,
        );

        let state = Self::new(catalog, credentials, config);
        state.restore_session();
        Ok(state)
    }

    /// Re-register the session cached in the slot, or clear a stale slot
    fn restore_session(&self) {
        let Some(stored) = self.slot.load() else {
            return;
        };
        let exists = self
            .read_catalog()
            .ok()
            .is_some_and(|catalog| catalog.user(&stored.user.id).is_some());
        if !exists {
            tracing::info!("Saved session belongs to unknown user {}, clearing", stored.user.id);
            self.slot.clear().log_warn("Failed to clear session slot");
            return;
        }
        if let Ok(mut sessions) = self.sessions() {
            sessions.insert(&stored.session_id, &stored.user.id);
            tracing::info!("Restored session for {}", stored.user.email);
        }
    }

    pub fn read_catalog(&self) -> Result<RwLockReadGuard<'_, Catalog>, ApiError> {
        self.catalog
            .read()
            .map_err(|_| ApiError::Internal("catalog lock poisoned".into()))
    }

    pub fn write_catalog(&self) -> Result<RwLockWriteGuard<'_, Catalog>, ApiError> {
        self.catalog
            .write()
            .map_err(|_| ApiError::Internal("catalog lock poisoned".into()))
    }

    pub fn sessions(&self) -> Result<MutexGuard<'_, SessionStore>, ApiError> {
        self.sessions
            .lock()
            .map_err(|_| ApiError::Internal("session store lock poisoned".into()))
    }

    pub fn credentials(&self) -> Result<MutexGuard<'_, Credentials>, ApiError> {
        self.credentials
            .lock()
            .map_err(|_| ApiError::Internal("credential store lock poisoned".into()))
    }

    pub fn media(&self) -> Result<MutexGuard<'_, MediaStore>, ApiError> {
        self.media
            .lock()
            .map_err(|_| ApiError::Internal("media store lock poisoned".into()))
    }
}
