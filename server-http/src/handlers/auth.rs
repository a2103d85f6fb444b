use crate::dto::{
    LoginRequest, LoginResponse, LogoutAllResponse, LogoutResponse, WhoAmIResponse,
};
use crate::state::AppState;
use axum::http::{header, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::{error, info};
use turnstile::auth::AuthError;
use turnstile::routing::{reply, Reply, RequestContext};

/// POST /auth/login
///
/// Accepts either a JSON body `{"username": "admin", "password": "admin123"}`
/// or an `Authorization: Basic base64(username:password)` header, and returns
/// a session token to send as `Authorization: Bearer <token>`.
pub async fn login(state: AppState, request: RequestContext) -> Reply {
    let (username, password) = match request.json::<LoginRequest>() {
        Ok(req) => (req.username, req.password),
        Err(_) => match request
            .header(header::AUTHORIZATION)
            .and_then(extract_basic_auth)
        {
            Some(credentials) => credentials,
            None => {
                return reply::error(
                    StatusCode::BAD_REQUEST,
                    "Missing credentials. Provide either JSON body or Basic Auth header",
                )
            }
        },
    };

    let client_ip = request.client_ip().map(str::to_string);

    match state.auth_service.login(&username, &password, client_ip).await {
        Ok(session) => reply::json(
            StatusCode::OK,
            &LoginResponse {
                expires_in: session.remaining_ttl_ms() / 1000,
                token: session.token,
                username: session.username,
            },
        ),
        Err(AuthError::InvalidCredentials) => {
            info!("LOGIN_FAILED: username={}", username);
            reply::error(StatusCode::UNAUTHORIZED, "Invalid username or password")
        }
        Err(e) => {
            error!("Failed to create session: {}", e);
            reply::error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session")
        }
    }
}

/// POST /auth/logout
///
/// Invalidates the bearer token the request was authenticated with.
pub async fn logout(state: AppState, request: RequestContext) -> Reply {
    let Some(claims) = request.claims() else {
        return reply::unauthorized();
    };

    match state.auth_service.logout(&claims.token).await {
        Ok(_) => reply::json(
            StatusCode::OK,
            &LogoutResponse {
                message: "Session logged out successfully".to_string(),
            },
        ),
        Err(e) => {
            error!("Failed to logout session: {}", e);
            reply::error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to logout session")
        }
    }
}

/// POST /auth/logout-all
///
/// Ends every session of the calling admin, this one included.
pub async fn logout_all(state: AppState, request: RequestContext) -> Reply {
    let Some(claims) = request.claims() else {
        return reply::unauthorized();
    };

    match state.auth_service.logout_everywhere(&claims.username).await {
        Ok(sessions_revoked) => {
            info!(
                "LOGOUT_ALL: username={}, sessions={}",
                claims.username, sessions_revoked
            );
            reply::json(StatusCode::OK, &LogoutAllResponse { sessions_revoked })
        }
        Err(e) => {
            error!("Failed to logout sessions: {}", e);
            reply::error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to logout sessions")
        }
    }
}

/// GET /auth/me
pub async fn whoami(state: AppState, request: RequestContext) -> Reply {
    let Some(claims) = request.claims() else {
        return reply::unauthorized();
    };

    match state.auth_service.active_sessions(&claims.username).await {
        Ok(sessions) => reply::json(
            StatusCode::OK,
            &WhoAmIResponse::new(claims, sessions.len()),
        ),
        Err(e) => {
            error!("Failed to list sessions: {}", e);
            reply::error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Extract Basic Auth credentials from Authorization header
fn extract_basic_auth(auth_header: &str) -> Option<(String, String)> {
    // Authorization: Basic <base64>
    let (scheme, encoded) = auth_header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;

    // Password may itself contain ':'
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_basic_auth() {
        let header = format!("Basic {}", STANDARD.encode("admin:password123"));
        assert_eq!(
            extract_basic_auth(&header),
            Some(("admin".to_string(), "password123".to_string()))
        );

        assert!(extract_basic_auth("Bearer token123").is_none());
        assert!(extract_basic_auth("Basic").is_none());
        assert!(extract_basic_auth("Basic !!!").is_none());
    }

    #[test]
    fn test_extract_basic_auth_with_colon_in_password() {
        let header = format!("Basic {}", STANDARD.encode("admin:pass:word:123"));
        assert_eq!(
            extract_basic_auth(&header),
            Some(("admin".to_string(), "pass:word:123".to_string()))
        );
    }
}
