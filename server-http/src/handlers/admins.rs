use crate::dto::{AdminSummary, ListAdminsResponse, RemoveAdminResponse};
use crate::state::AppState;
use axum::http::StatusCode;
use tracing::{error, info};
use turnstile::auth::AuthError;
use turnstile::routing::{reply, Reply, RequestContext};

/// GET /admin/admins
pub async fn list_admins(state: AppState, _request: RequestContext) -> Reply {
    match state.auth_service.list_admins().await {
        Ok(admins) => reply::json(
            StatusCode::OK,
            &ListAdminsResponse {
                admins: admins.into_iter().map(AdminSummary::from).collect(),
            },
        ),
        Err(e) => {
            error!("Failed to list admins: {}", e);
            reply::error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// DELETE /admin/admins/{admin_id}
///
/// Removes the account, ends its sessions and revokes its route grants.
pub async fn remove_admin(state: AppState, request: RequestContext) -> Reply {
    let Some(admin_id) = request.param("admin_id") else {
        return reply::error(StatusCode::BAD_REQUEST, "Missing admin_id");
    };

    if request.claims().is_some_and(|c| c.admin_id == admin_id) {
        return reply::error(StatusCode::BAD_REQUEST, "Cannot remove your own account");
    }

    let (admin, sessions_revoked) = match state.auth_service.remove_admin(admin_id).await {
        Ok(removed) => removed,
        Err(AuthError::AdminNotFound) => {
            return reply::error(StatusCode::NOT_FOUND, "Admin not found")
        }
        Err(e) => {
            error!("Failed to remove admin: {}", e);
            return reply::error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let grants_revoked = match state.grants.revoke_all(&admin.id).await {
        Ok(count) => count,
        Err(e) => {
            error!("Admin {} removed but grants remain: {}", admin.id, e);
            return reply::error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    info!(
        "REMOVE_ADMIN: admin_id={}, username={}, sessions={}, grants={}",
        admin.id, admin.username, sessions_revoked, grants_revoked
    );

    reply::json(
        StatusCode::OK,
        &RemoveAdminResponse {
            admin_id: admin.id,
            username: admin.username,
            sessions_revoked,
            grants_revoked,
        },
    )
}
