use super::admin::Admin;
use super::session::{generate_session_token, Session, SessionToken};
use super::session_store::SessionRepository;
use async_trait::async_trait;
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use moka::Entry;
use parking_lot::RwLock;
use shared::Result;
use std::sync::Arc;
use std::time::Duration;

pub type Username = String;

/// Moka-based in-memory session repository with dual-index support
pub struct MokaSessionRepository {
    // Primary index: token -> session
    sessions: Cache<SessionToken, Session>,
    // Secondary index: username -> session tokens
    admin_sessions: Cache<Username, Arc<RwLock<Vec<SessionToken>>>>,
}

impl MokaSessionRepository {
    /// Create a new Moka session repository with specified capacity and default TTL
    pub fn new(max_sessions: Option<u64>, default_ttl: Option<Duration>) -> Self {
        let mut sessions_builder = Cache::builder();
        let mut admin_sessions_builder = Cache::builder();

        if let Some(capacity) = max_sessions {
            sessions_builder = sessions_builder.max_capacity(capacity);
            admin_sessions_builder = admin_sessions_builder.max_capacity(capacity);
        }

        if let Some(ttl) = default_ttl {
            sessions_builder = sessions_builder.time_to_live(ttl);
            admin_sessions_builder = admin_sessions_builder.time_to_live(ttl);
        }

        Self {
            sessions: sessions_builder.build(),
            admin_sessions: admin_sessions_builder.build(),
        }
    }

    /// Create with default settings (unbounded, 1 hour TTL)
    pub fn with_defaults() -> Self {
        Self::new(None, Some(Duration::from_secs(3600)))
    }

    async fn tokens_for(&self, username: &str) -> Vec<SessionToken> {
        match self.admin_sessions.get(username).await {
            // Clone tokens to release lock before awaiting
            Some(tokens_lock) => tokens_lock.read().clone(),
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl SessionRepository for MokaSessionRepository {
    async fn create_session(
        &self,
        admin: &Admin,
        ttl_ms: u64,
        client_ip: Option<String>,
    ) -> Result<Session> {
        let token = generate_session_token();
        let session = Session::new(token.clone(), admin, ttl_ms, client_ip);

        self.sessions.insert(token.clone(), session.clone()).await;

        let tokens_lock = self
            .admin_sessions
            .get(&admin.username)
            .await
            .unwrap_or_else(|| Arc::new(RwLock::new(Vec::new())));

        {
            let mut tokens = tokens_lock.write();
            // Lazy cleanup of tokens the primary index already dropped
            tokens.retain(|t| self.sessions.contains_key(t));
            tokens.push(token);
        }

        self.admin_sessions
            .insert(admin.username.clone(), tokens_lock)
            .await;

        Ok(session)
    }

    async fn get_session(&self, token: &SessionToken) -> Result<Session> {
        // Refresh under the key's compute lock so a concurrent logout cannot
        // be undone by writing the session back
        let result = self
            .sessions
            .entry(token.clone())
            .and_compute_with(|current| async move {
                match current.map(Entry::into_value) {
                    Some(session) if session.is_expired() => Op::Remove,
                    Some(mut session) => {
                        session.update_last_accessed();
                        Op::Put(session)
                    }
                    None => Op::Nop,
                }
            })
            .await;

        match result {
            CompResult::ReplacedWith(entry) => Ok(entry.into_value()),
            _ => Err(shared::Error::NotFound),
        }
    }

    async fn delete_session(&self, token: &SessionToken) -> Result<bool> {
        let result = self
            .sessions
            .entry(token.clone())
            .and_compute_with(|current| async move {
                match current {
                    Some(_) => Op::Remove,
                    None => Op::Nop,
                }
            })
            .await;

        let CompResult::Removed(entry) = result else {
            return Ok(false);
        };

        let session = entry.into_value();
        if let Some(tokens_lock) = self.admin_sessions.get(&session.username).await {
            tokens_lock.write().retain(|t| t != token);
        }

        Ok(true)
    }

    async fn get_admin_sessions(&self, username: &str) -> Result<Vec<Session>> {
        let mut sessions = Vec::new();

        for token in self.tokens_for(username).await {
            if let Some(session) = self.sessions.get(&token).await {
                if !session.is_expired() {
                    sessions.push(session);
                }
            }
        }

        Ok(sessions)
    }

    async fn delete_admin_sessions(&self, username: &str) -> Result<usize> {
        let mut count = 0;

        for token in self.tokens_for(username).await {
            if self.delete_session(&token).await? {
                count += 1;
            }
        }

        self.admin_sessions.invalidate(username).await;

        Ok(count)
    }
}
