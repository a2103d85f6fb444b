use crate::dto::{GrantRequest, GrantResponse, ListGrantsResponse, RevokeGrantResponse};
use crate::state::AppState;
use crate::validation::validate_grant_request;
use axum::http::StatusCode;
use tracing::{error, info};
use turnstile::routing::{reply, Reply, RequestContext};

/// GET /admin/grants/{admin_id}
pub async fn list_grants(state: AppState, request: RequestContext) -> Reply {
    let Some(admin_id) = request.param("admin_id") else {
        return reply::error(StatusCode::BAD_REQUEST, "Missing admin_id");
    };

    match state.grants.list_for_admin(admin_id).await {
        Ok(grants) => reply::json(
            StatusCode::OK,
            &ListGrantsResponse {
                admin_id: admin_id.to_string(),
                grants: grants.into_iter().map(GrantResponse::from).collect(),
            },
        ),
        Err(e) => {
            error!("Failed to list grants: {}", e);
            reply::error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// POST /admin/grants
pub async fn create_grant(state: AppState, request: RequestContext) -> Reply {
    let req = match parse_grant_request(&request) {
        Ok(req) => req,
        Err(rejection) => return rejection,
    };

    match state.auth_service.find_admin_by_id(&req.admin_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return reply::error(StatusCode::NOT_FOUND, "Admin not found"),
        Err(e) => {
            error!("Failed to look up admin: {}", e);
            return reply::error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    }

    info!(
        "CREATE_GRANT: admin_id={}, route={}, requested_by={}",
        req.admin_id,
        req.route,
        requested_by(&request)
    );

    match state.grants.grant(&req.admin_id, &req.route).await {
        Ok(grant) => reply::json(StatusCode::CREATED, &GrantResponse::from(grant)),
        Err(e) => {
            error!("Failed to create grant: {}", e);
            reply::error(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

/// DELETE /admin/grants
pub async fn revoke_grant(state: AppState, request: RequestContext) -> Reply {
    let req = match parse_grant_request(&request) {
        Ok(req) => req,
        Err(rejection) => return rejection,
    };

    info!(
        "REVOKE_GRANT: admin_id={}, route={}, requested_by={}",
        req.admin_id,
        req.route,
        requested_by(&request)
    );

    match state.grants.revoke(&req.admin_id, &req.route).await {
        Ok(true) => reply::json(StatusCode::OK, &RevokeGrantResponse { revoked: true }),
        Ok(false) => reply::error(StatusCode::NOT_FOUND, "Grant not found"),
        Err(e) => {
            error!("Failed to revoke grant: {}", e);
            reply::error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn parse_grant_request(request: &RequestContext) -> Result<GrantRequest, Reply> {
    let req: GrantRequest = request
        .json()
        .map_err(|e| reply::error(StatusCode::BAD_REQUEST, format!("Invalid JSON body: {}", e)))?;

    validate_grant_request(&req)
        .map_err(|e| reply::error(StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok(req)
}

fn requested_by(request: &RequestContext) -> &str {
    request.claims().map(|c| c.username.as_str()).unwrap_or("-")
}
