//! Password hashes keyed by account id.
//!
//! Kept apart from [`User`](crate::domain::User) so account records can be
//! serialized and shown to admins without ever carrying a hash.

use std::collections::HashMap;

use super::password;

#[derive(Debug, Default)]
pub struct Credentials {
    hashes: HashMap<String, String>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the same precomputed hash to several accounts
    pub fn with_shared_hash<'a>(user_ids: impl IntoIterator<Item = &'a str>, hash: &str) -> Self {
        let hashes = user_ids
            .into_iter()
            .map(|id| (id.to_string(), hash.to_string()))
            .collect();
        Self { hashes }
    }

    pub fn set(&mut self, user_id: &str, hash: String) {
        self.hashes.insert(user_id.to_string(), hash);
    }

    pub fn remove(&mut self, user_id: &str) -> bool {
        self.hashes.remove(user_id).is_some()
    }

    /// Accounts without a password can never log in
    pub fn verify(&self, user_id: &str, candidate: &str) -> bool {
        self.hashes
            .get(user_id)
            .is_some_and(|hash| password::verify_password(candidate, hash))
    }
}
