use super::error::AuthError;
use super::pool::StoreConnection;
use async_trait::async_trait;

/// Decides whether an admin may call a route pattern
#[async_trait]
pub trait RouteAuthorizer: Send + Sync {
    async fn is_authorized(
        &self,
        conn: &StoreConnection,
        admin_id: &str,
        route: &str,
    ) -> Result<bool, AuthError>;
}

/// Authorizes against the grant repository behind the connection
#[derive(Debug, Default, Clone, Copy)]
pub struct GrantRouteAuthorizer;

#[async_trait]
impl RouteAuthorizer for GrantRouteAuthorizer {
    async fn is_authorized(
        &self,
        conn: &StoreConnection,
        admin_id: &str,
        route: &str,
    ) -> Result<bool, AuthError> {
        conn.grants().is_granted(admin_id, route).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::moka_session_repository::MokaSessionRepository;
    use crate::auth::repository::GrantRepository;
    use crate::auth::session_store::SessionStore;
    use crate::auth::sled_repository::SledGrantRepository;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_authorizes_granted_routes_only() {
        let temp_dir = TempDir::new().unwrap();
        let grants =
            Arc::new(SledGrantRepository::new(temp_dir.path().join("grants.sled")).unwrap());
        grants.grant("a1", "/admin/delete").await.unwrap();

        let sessions = Arc::new(SessionStore::new(Arc::new(
            MokaSessionRepository::with_defaults(),
        )));
        let conn = StoreConnection::new(sessions, grants, None);

        let authorizer = GrantRouteAuthorizer;
        assert!(authorizer.is_authorized(&conn, "a1", "/admin/delete").await.unwrap());
        assert!(!authorizer.is_authorized(&conn, "a1", "/admin/other").await.unwrap());
        assert!(!authorizer.is_authorized(&conn, "a2", "/admin/delete").await.unwrap());
    }
}
