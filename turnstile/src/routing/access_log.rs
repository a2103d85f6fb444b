use super::context::RequestContext;
use super::descriptor::RouteInfo;
use crate::auth::Claims;
use tracing::info;

/// Records every request admitted by the auth gate
pub trait AccessLogger: Send + Sync {
    fn log(&self, route: &RouteInfo, request: &RequestContext, claims: Option<&Claims>);
}

/// Emits one structured `tracing` event per admitted request
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAccessLogger;

impl AccessLogger for TracingAccessLogger {
    fn log(&self, route: &RouteInfo, request: &RequestContext, claims: Option<&Claims>) {
        info!(
            target: "turnstile::access",
            module = %route.module,
            name = %route.name,
            method = %route.method,
            route = %route.route,
            path = request.path(),
            admin_id = claims.map(|c| c.admin_id.as_str()).unwrap_or("-"),
            client_ip = request.client_ip().unwrap_or("-"),
            "access"
        );
    }
}
