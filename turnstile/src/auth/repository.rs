use super::admin::{Admin, RouteGrant};
use super::error::AuthError;
use async_trait::async_trait;

#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Create a new admin
    async fn create(&self, admin: Admin) -> Result<Admin, AuthError>;

    /// Find an admin by username
    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, AuthError>;

    /// Find an admin by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Admin>, AuthError>;

    /// List all admins
    async fn list_all(&self) -> Result<Vec<Admin>, AuthError>;

    /// Delete an admin by ID
    async fn delete(&self, id: &str) -> Result<(), AuthError>;

    /// Check if a username exists
    async fn username_exists(&self, username: &str) -> Result<bool, AuthError>;
}

#[async_trait]
pub trait GrantRepository: Send + Sync {
    /// Grant an admin access to a route pattern (idempotent)
    async fn grant(&self, admin_id: &str, route: &str) -> Result<RouteGrant, AuthError>;

    /// Revoke a grant, returning whether it existed
    async fn revoke(&self, admin_id: &str, route: &str) -> Result<bool, AuthError>;

    /// List every grant held by an admin
    async fn list_for_admin(&self, admin_id: &str) -> Result<Vec<RouteGrant>, AuthError>;

    /// Whether the admin holds a grant covering the route (exact or wildcard)
    async fn is_granted(&self, admin_id: &str, route: &str) -> Result<bool, AuthError>;

    /// Drop every grant held by an admin
    async fn revoke_all(&self, admin_id: &str) -> Result<usize, AuthError>;
}
