use super::admin::Admin;
use super::error::AuthError;
use super::password::{hash_password, verify_password};
use super::repository::AdminRepository;
use super::session::{Session, SessionToken};
use super::session_store::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct AuthService {
    admin_repo: Arc<dyn AdminRepository>,
    sessions: Arc<SessionStore>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(
        admin_repo: Arc<dyn AdminRepository>,
        sessions: Arc<SessionStore>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            admin_repo,
            sessions,
            session_ttl,
        }
    }

    /// Create an admin account with a hashed password
    pub async fn create_admin(&self, username: &str, password: &str) -> Result<Admin, AuthError> {
        if self.admin_repo.username_exists(username).await? {
            return Err(AuthError::AdminAlreadyExists);
        }

        let password_hash = hash_password(password)?;
        self.admin_repo
            .create(Admin::new(username.to_string(), password_hash))
            .await
    }

    pub async fn find_admin(&self, username: &str) -> Result<Option<Admin>, AuthError> {
        self.admin_repo.find_by_username(username).await
    }

    pub async fn find_admin_by_id(&self, id: &str) -> Result<Option<Admin>, AuthError> {
        self.admin_repo.find_by_id(id).await
    }

    pub async fn list_admins(&self) -> Result<Vec<Admin>, AuthError> {
        self.admin_repo.list_all().await
    }

    /// Delete an admin account and end its sessions.
    ///
    /// Returns the removed admin and the number of sessions ended. Route
    /// grants live in their own repository and are left to the caller.
    pub async fn remove_admin(&self, admin_id: &str) -> Result<(Admin, usize), AuthError> {
        let admin = self
            .admin_repo
            .find_by_id(admin_id)
            .await?
            .ok_or(AuthError::AdminNotFound)?;

        self.admin_repo.delete(&admin.id).await?;
        let sessions = self.logout_everywhere(&admin.username).await?;

        info!(username = %admin.username, sessions, "admin removed");
        Ok((admin, sessions))
    }

    /// Authenticate an admin by username and password
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Admin, AuthError> {
        let admin = self
            .admin_repo
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &admin.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(admin)
    }

    /// Authenticate and open a session whose token can be sent as a bearer token
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        client_ip: Option<String>,
    ) -> Result<Session, AuthError> {
        let admin = self.authenticate(username, password).await?;

        let session = self
            .sessions
            .create_session(&admin, self.session_ttl.as_millis() as u64, client_ip)
            .await?;

        info!(username = %admin.username, "admin logged in");
        Ok(session)
    }

    /// Invalidate a session token, returning whether it was live
    pub async fn logout(&self, token: &SessionToken) -> Result<bool, AuthError> {
        Ok(self.sessions.invalidate_session(token).await?)
    }

    /// Invalidate every session an admin holds
    pub async fn logout_everywhere(&self, username: &str) -> Result<usize, AuthError> {
        Ok(self.sessions.invalidate_admin_sessions(username).await?)
    }

    pub async fn active_sessions(&self, username: &str) -> Result<Vec<Session>, AuthError> {
        Ok(self.sessions.get_admin_sessions(username).await?)
    }
}
