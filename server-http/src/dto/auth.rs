use serde::{Deserialize, Serialize};
use turnstile::auth::{Admin, Claims, RouteGrant};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response body for successful login
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Send as `Authorization: Bearer <token>`
    pub token: String,
    /// Session expiration time in seconds from now
    pub expires_in: u64,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutAllResponse {
    pub sessions_revoked: usize,
}

/// The verified identity behind the caller's token
#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub admin_id: String,
    pub username: String,
    pub issued_at: u64,
    pub expires_at: u64,
    pub active_sessions: usize,
}

impl WhoAmIResponse {
    pub fn new(claims: &Claims, active_sessions: usize) -> Self {
        Self {
            admin_id: claims.admin_id.clone(),
            username: claims.username.clone(),
            issued_at: claims.issued_at,
            expires_at: claims.expires_at,
            active_sessions,
        }
    }
}

/// An admin account without its password hash
#[derive(Debug, Serialize)]
pub struct AdminSummary {
    pub id: String,
    pub username: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Admin> for AdminSummary {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            created_at: admin.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListAdminsResponse {
    pub admins: Vec<AdminSummary>,
}

#[derive(Debug, Serialize)]
pub struct RemoveAdminResponse {
    pub admin_id: String,
    pub username: String,
    pub sessions_revoked: usize,
    pub grants_revoked: usize,
}

#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    pub admin_id: String,
    pub route: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GrantResponse {
    pub admin_id: String,
    pub route: String,
    pub granted_at: chrono::DateTime<chrono::Utc>,
}

impl From<RouteGrant> for GrantResponse {
    fn from(grant: RouteGrant) -> Self {
        Self {
            admin_id: grant.admin_id,
            route: grant.route,
            granted_at: grant.granted_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListGrantsResponse {
    pub admin_id: String,
    pub grants: Vec<GrantResponse>,
}

#[derive(Debug, Serialize)]
pub struct RevokeGrantResponse {
    pub revoked: bool,
}
