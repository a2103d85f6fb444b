use super::admin::Admin;
use super::session::{Session, SessionToken};
use async_trait::async_trait;
use shared::Result;
use std::sync::Arc;

/// Trait for session storage operations
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Create a new session for the given admin with specified TTL and optional client IP
    async fn create_session(
        &self,
        admin: &Admin,
        ttl_ms: u64,
        client_ip: Option<String>,
    ) -> Result<Session>;

    /// Get a live session by token, refreshing its last_accessed timestamp
    async fn get_session(&self, token: &SessionToken) -> Result<Session>;

    /// Delete a session (logout)
    async fn delete_session(&self, token: &SessionToken) -> Result<bool>;

    /// Get all active sessions for an admin
    async fn get_admin_sessions(&self, username: &str) -> Result<Vec<Session>>;

    /// Delete all sessions for an admin (logout everywhere)
    async fn delete_admin_sessions(&self, username: &str) -> Result<usize>;
}

/// Session store service
pub struct SessionStore {
    repository: Arc<dyn SessionRepository>,
}

impl SessionStore {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_session(
        &self,
        admin: &Admin,
        ttl_ms: u64,
        client_ip: Option<String>,
    ) -> Result<Session> {
        self.repository.create_session(admin, ttl_ms, client_ip).await
    }

    /// Validate a session token and return the session behind it
    pub async fn validate_session(&self, token: &SessionToken) -> Result<Session> {
        self.repository.get_session(token).await
    }

    pub async fn invalidate_session(&self, token: &SessionToken) -> Result<bool> {
        self.repository.delete_session(token).await
    }

    /// Live sessions an admin holds
    pub async fn get_admin_sessions(&self, username: &str) -> Result<Vec<Session>> {
        self.repository.get_admin_sessions(username).await
    }

    pub async fn invalidate_admin_sessions(&self, username: &str) -> Result<usize> {
        self.repository.delete_admin_sessions(username).await
    }
}
