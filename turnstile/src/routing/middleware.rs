//! Token authentication in front of route controllers.
//!
//! Per request the gate:
//!
//! 1. stamps cross-origin headers on whatever response leaves it, keeping
//!    any the controller set itself,
//! 2. lets routes without `token_auth` straight through, claims absent,
//! 3. otherwise borrows a store connection, verifies the request's token and,
//!    for `route_auth` routes, checks the admin's grant for the route pattern,
//! 4. derives a context carrying the claims, logs the access and calls the
//!    wrapped controller.
//!
//! Every failure in step 3 yields the same `401 Unauthorized` text body.

use super::access_log::AccessLogger;
use super::context::RequestContext;
use super::controller::Controller;
use super::cors::CorsPolicy;
use super::descriptor::RouteInfo;
use super::reply::{self, Reply};
use crate::auth::{RouteAuthorizer, StorePool, TokenVerifier};
use async_trait::async_trait;
use http::header;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Why a request was turned away. Only ever logged.
#[derive(Debug)]
enum Rejection {
    StoreUnavailable(String),
    InvalidToken,
    RouteNotGranted { admin_id: String },
    GrantLookupFailed(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::StoreUnavailable(e) => write!(f, "store unavailable: {}", e),
            Rejection::InvalidToken => write!(f, "missing, unknown or expired token"),
            Rejection::RouteNotGranted { admin_id } => {
                write!(f, "admin {} holds no grant for route", admin_id)
            }
            Rejection::GrantLookupFailed(e) => write!(f, "grant lookup failed: {}", e),
        }
    }
}

pub struct AuthGate {
    pool: Arc<dyn StorePool>,
    verifier: Arc<dyn TokenVerifier>,
    authorizer: Arc<dyn RouteAuthorizer>,
    access_log: Arc<dyn AccessLogger>,
    cors: CorsPolicy,
}

impl AuthGate {
    pub fn new(
        pool: Arc<dyn StorePool>,
        verifier: Arc<dyn TokenVerifier>,
        authorizer: Arc<dyn RouteAuthorizer>,
        access_log: Arc<dyn AccessLogger>,
    ) -> Self {
        Self {
            pool,
            verifier,
            authorizer,
            access_log,
            cors: CorsPolicy::permissive(),
        }
    }

    pub fn with_cors(mut self, cors: CorsPolicy) -> Self {
        self.cors = cors;
        self
    }

    pub fn cors(&self) -> &CorsPolicy {
        &self.cors
    }

    /// Wrap a controller so every call goes through this gate first
    pub fn wrap(self: &Arc<Self>, route: RouteInfo, next: Arc<dyn Controller>) -> Arc<dyn Controller> {
        Arc::new(GuardedController {
            gate: self.clone(),
            route,
            next,
        })
    }

    /// Run one request through the gate and, if admitted, the controller
    pub async fn serve(
        &self,
        route: &RouteInfo,
        next: &dyn Controller,
        request: RequestContext,
    ) -> Reply {
        let origin = request.headers().get(header::ORIGIN).cloned();

        let mut reply = match self.admit(route, request).await {
            Ok(request) => {
                self.access_log.log(route, &request, request.claims());
                next.handle(request).await
            }
            Err(rejection) => {
                debug!(
                    method = %route.method,
                    route = %route.route,
                    "request rejected: {}",
                    rejection
                );
                reply::unauthorized()
            }
        };

        self.cors.apply(origin.as_ref(), &mut reply);
        reply
    }

    /// The context the controller should see, or why it must not run.
    ///
    /// The store connection lives only inside this call: it is released
    /// before the controller runs, on success and on every rejection.
    async fn admit(
        &self,
        route: &RouteInfo,
        request: RequestContext,
    ) -> Result<RequestContext, Rejection> {
        if !route.token_auth {
            return Ok(request);
        }

        let conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| Rejection::StoreUnavailable(e.to_string()))?;

        let claims = self
            .verifier
            .verify(&conn, &request)
            .await
            .ok_or(Rejection::InvalidToken)?;

        if route.route_auth {
            let granted = self
                .authorizer
                .is_authorized(&conn, &claims.admin_id, &route.route)
                .await
                .map_err(|e| Rejection::GrantLookupFailed(e.to_string()))?;

            if !granted {
                return Err(Rejection::RouteNotGranted {
                    admin_id: claims.admin_id,
                });
            }
        }

        Ok(request.with_claims(claims))
    }
}

/// A controller wrapped by an [`AuthGate`]
pub struct GuardedController {
    gate: Arc<AuthGate>,
    route: RouteInfo,
    next: Arc<dyn Controller>,
}

#[async_trait]
impl Controller for GuardedController {
    async fn handle(&self, request: RequestContext) -> Reply {
        self.gate.serve(&self.route, self.next.as_ref(), request).await
    }
}
