//! Scoped, pooled access to the session and grant stores.
//!
//! Every authenticated request borrows one [`StoreConnection`] for its checks.
//! The connection owns a pool permit; dropping it returns the permit, so the
//! release happens exactly once whichever way the request leaves the gate.

use super::repository::GrantRepository;
use super::session_store::SessionStore;
use async_trait::async_trait;
use shared::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::trace;

/// A per-request handle onto the session and grant stores
pub struct StoreConnection {
    sessions: Arc<SessionStore>,
    grants: Arc<dyn GrantRepository>,
    _permit: Option<OwnedSemaphorePermit>,
}

impl StoreConnection {
    pub fn new(
        sessions: Arc<SessionStore>,
        grants: Arc<dyn GrantRepository>,
        permit: Option<OwnedSemaphorePermit>,
    ) -> Self {
        Self {
            sessions,
            grants,
            _permit: permit,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn grants(&self) -> &dyn GrantRepository {
        self.grants.as_ref()
    }
}

impl Drop for StoreConnection {
    fn drop(&mut self) {
        trace!("store connection released");
    }
}

/// Source of per-request store connections
#[async_trait]
pub trait StorePool: Send + Sync {
    async fn acquire(&self) -> Result<StoreConnection>;
}

/// Pool bounded by a semaphore; acquisition waits at most `acquire_timeout`
pub struct SemaphoreStorePool {
    sessions: Arc<SessionStore>,
    grants: Arc<dyn GrantRepository>,
    permits: Arc<Semaphore>,
    size: usize,
    acquire_timeout: Duration,
}

impl SemaphoreStorePool {
    pub fn new(
        sessions: Arc<SessionStore>,
        grants: Arc<dyn GrantRepository>,
        size: usize,
        acquire_timeout: Duration,
    ) -> Self {
        Self {
            sessions,
            grants,
            permits: Arc::new(Semaphore::new(size)),
            size,
            acquire_timeout,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Connections that can be acquired right now
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Refuse all further acquisitions
    pub fn close(&self) {
        self.permits.close();
    }
}

#[async_trait]
impl StorePool for SemaphoreStorePool {
    async fn acquire(&self) -> Result<StoreConnection> {
        let permit = tokio::time::timeout(self.acquire_timeout, self.permits.clone().acquire_owned())
            .await
            .map_err(|_| {
                Error::PoolUnavailable(format!(
                    "no connection free after {}ms",
                    self.acquire_timeout.as_millis()
                ))
            })?
            .map_err(|_| Error::PoolUnavailable("pool closed".to_string()))?;

        trace!(available = self.available(), "store connection acquired");

        Ok(StoreConnection::new(
            self.sessions.clone(),
            self.grants.clone(),
            Some(permit),
        ))
    }
}
