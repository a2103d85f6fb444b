use super::admin::{Admin, WILDCARD_ROUTE};
use super::auth_service::AuthService;
use super::error::AuthError;
use super::repository::GrantRepository;
use tracing::info;

/// Make sure the bootstrap admin exists and may call every route.
///
/// An existing account keeps its password; only the wildcard grant is
/// (re)applied.
pub async fn ensure_default_admin(
    auth_service: &AuthService,
    grants: &dyn GrantRepository,
    username: &str,
    password: &str,
) -> Result<Admin, AuthError> {
    let admin = match auth_service.find_admin(username).await? {
        Some(admin) => {
            info!("Admin already exists: {}", username);
            admin
        }
        None => {
            info!("Creating default admin: {}", username);
            auth_service.create_admin(username, password).await?
        }
    };

    grants.grant(&admin.id, WILDCARD_ROUTE).await?;

    Ok(admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::moka_session_repository::MokaSessionRepository;
    use crate::auth::session_store::SessionStore;
    use crate::auth::sled_repository::{SledAdminRepository, SledGrantRepository};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_default_admin_is_created_once_with_wildcard() {
        let temp_dir = TempDir::new().unwrap();
        let admin_repo =
            Arc::new(SledAdminRepository::new(temp_dir.path().join("admins.sled")).unwrap());
        let grants = SledGrantRepository::new(temp_dir.path().join("grants.sled")).unwrap();
        let sessions = Arc::new(SessionStore::new(Arc::new(
            MokaSessionRepository::with_defaults(),
        )));
        let service = AuthService::new(admin_repo, sessions, Duration::from_secs(60));

        let first = ensure_default_admin(&service, &grants, "admin", "admin123")
            .await
            .unwrap();
        let second = ensure_default_admin(&service, &grants, "admin", "ignored99")
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert!(service.authenticate("admin", "admin123").await.is_ok());
        assert!(grants.is_granted(&first.id, "/any/route").await.unwrap());
        assert_eq!(grants.list_for_admin(&first.id).await.unwrap().len(), 1);
    }
}
