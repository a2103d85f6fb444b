use std::sync::Arc;
use turnstile::auth::{AuthService, GrantRepository};

/// Server state shared across controllers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub grants: Arc<dyn GrantRepository>,
}

impl AppState {
    pub fn new(auth_service: Arc<AuthService>, grants: Arc<dyn GrantRepository>) -> Self {
        Self {
            auth_service,
            grants,
        }
    }
}
