//! Authentication: password hashes, login sessions and request extractors.

pub mod credentials;
pub mod handlers;
pub mod middleware;
pub mod password;
pub mod session;

pub use handlers::*;
pub use middleware::{AuthContext, OptionalAuth, SESSION_COOKIE_NAME};
