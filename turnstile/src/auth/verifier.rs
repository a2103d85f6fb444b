use super::claims::Claims;
use super::pool::StoreConnection;
use crate::routing::RequestContext;
use async_trait::async_trait;
use http::header;
use tracing::debug;

/// Header consulted when no `Authorization: Bearer` header is present
pub const TOKEN_HEADER: &str = "x-auth-token";

/// Verifies the token carried by a request
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// The claims behind the request's token, or `None` when it is missing,
    /// unknown, or expired
    async fn verify(&self, conn: &StoreConnection, request: &RequestContext) -> Option<Claims>;
}

/// Resolves bearer tokens through the session store
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionTokenVerifier;

impl SessionTokenVerifier {
    fn token_of(request: &RequestContext) -> Option<String> {
        request
            .header(header::AUTHORIZATION)
            .and_then(extract_bearer_token)
            .or_else(|| {
                request
                    .header(TOKEN_HEADER)
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
            })
    }
}

#[async_trait]
impl TokenVerifier for SessionTokenVerifier {
    async fn verify(&self, conn: &StoreConnection, request: &RequestContext) -> Option<Claims> {
        let token = Self::token_of(request)?;

        match conn.sessions().validate_session(&token).await {
            Ok(session) => Some(session.claims()),
            Err(e) => {
                debug!(path = request.path(), "token rejected: {}", e);
                None
            }
        }
    }
}

/// Extract Bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    // Authorization: Bearer <token>
    let mut parts = auth_header.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("Bearer") => {
            Some(token.to_string())
        }
        _ => None,
    }
}
