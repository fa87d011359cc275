//! Authentication route handlers
//!
//! - Login with email and password
//! - Single-use refresh token rotation
//! - Logout
//! - Delegated validation for components without the signing secret
//! - The authenticated caller's identity

pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;
pub mod validate;

use std::sync::Arc;

use tt_core::services::AuthService;

use crate::routes::health::Backends;

/// Shared state of the auth routes
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub backends: Backends,
}

impl AppState {
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self {
            auth_service,
            backends: Backends::default(),
        }
    }

    /// Attach the store backends reported by `/health`
    pub fn with_backends(mut self, backends: Backends) -> Self {
        self.backends = backends;
        self
    }
}
