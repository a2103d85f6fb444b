use crate::dispatcher::AxumDispatcher;
use crate::handlers;
use crate::state::AppState;
use axum::{http::Method, Router};
use shared::config::Config;
use std::future::Future;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use turnstile::auth::{GrantRouteAuthorizer, SessionTokenVerifier, StorePool};
use turnstile::routing::{
    handler_fn, AuthGate, Controller, CorsPolicy, Reply, RequestContext, RouteDescriptor,
    RouteRegistry, TracingAccessLogger,
};

/// Turn a `(state, request)` handler into a controller bound to `state`
fn bind<F, Fut>(state: &AppState, f: F) -> Arc<dyn Controller>
where
    F: Fn(AppState, RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send + 'static,
{
    let state = state.clone();
    handler_fn(move |request| f(state.clone(), request))
}

/// The server's built-in routes
pub fn route_table(state: &AppState) -> Vec<RouteDescriptor> {
    vec![
        // System
        RouteDescriptor::home(
            "system",
            "health",
            Method::GET,
            "/health",
            bind(state, handlers::health_check),
            false,
        ),
        // Sessions
        RouteDescriptor::home(
            "auth",
            "login",
            Method::POST,
            "/auth/login",
            bind(state, handlers::login),
            false,
        ),
        RouteDescriptor::home(
            "auth",
            "logout",
            Method::POST,
            "/auth/logout",
            bind(state, handlers::logout),
            true,
        ),
        RouteDescriptor::home(
            "auth",
            "logout all",
            Method::POST,
            "/auth/logout-all",
            bind(state, handlers::logout_all),
            true,
        ),
        RouteDescriptor::home(
            "auth",
            "whoami",
            Method::GET,
            "/auth/me",
            bind(state, handlers::whoami),
            true,
        ),
        // Admin accounts
        RouteDescriptor::new(
            "admin",
            "list admins",
            Method::GET,
            "/admin/admins",
            bind(state, handlers::list_admins),
            true,
            true,
        ),
        RouteDescriptor::new(
            "admin",
            "remove admin",
            Method::DELETE,
            "/admin/admins/{admin_id}",
            bind(state, handlers::remove_admin),
            true,
            true,
        ),
        // Route grants
        RouteDescriptor::new(
            "admin",
            "list grants",
            Method::GET,
            "/admin/grants/{admin_id}",
            bind(state, handlers::list_grants),
            true,
            true,
        ),
        RouteDescriptor::new(
            "admin",
            "create grant",
            Method::POST,
            "/admin/grants",
            bind(state, handlers::create_grant),
            true,
            true,
        ),
        RouteDescriptor::new(
            "admin",
            "revoke grant",
            Method::DELETE,
            "/admin/grants",
            bind(state, handlers::revoke_grant),
            true,
            true,
        ),
    ]
}

/// Auth gate backed by session tokens and stored route grants
pub fn build_gate(pool: Arc<dyn StorePool>, config: &Config) -> Arc<AuthGate> {
    Arc::new(
        AuthGate::new(
            pool,
            Arc::new(SessionTokenVerifier),
            Arc::new(GrantRouteAuthorizer),
            Arc::new(TracingAccessLogger),
        )
        .with_cors(CorsPolicy::new(&config.allowed_origins)),
    )
}

/// Build and configure the application router
pub fn build_router(state: &AppState, gate: Arc<AuthGate>) -> shared::Result<Router> {
    let dispatcher = AxumDispatcher::new().with_preflight(gate.cors().clone());
    let mut registry = RouteRegistry::new(dispatcher, gate);

    registry.set_route_handles(route_table(state))?;
    info!("Registered {} routes", registry.routes().len());

    Ok(registry
        .into_dispatcher()
        .into_router()
        .layer(TraceLayer::new_for_http()))
}
