use crate::dto::HealthResponse;
use crate::state::AppState;
use axum::http::StatusCode;
use turnstile::routing::{reply, Reply, RequestContext};

/// GET /health
pub async fn health_check(_state: AppState, _request: RequestContext) -> Reply {
    reply::json(
        StatusCode::OK,
        &HealthResponse {
            message: "OK".into(),
        },
    )
}
