//! Bridges turnstile controllers onto an axum [`Router`].
//!
//! Each registered `(method, pattern)` becomes one method route on the
//! pattern's [`MethodRouter`]. Patterns are checked before they reach axum,
//! so a conflicting or malformed pattern is an error instead of a panic in
//! [`AxumDispatcher::into_router`]. Requests are converted to [`RequestContext`]
//! on the way in and [`Reply`] is converted back on the way out, so axum types
//! never reach controller code.

use axum::{
    body::Body,
    extract::{ConnectInfo, FromRequestParts, RawPathParams, Request},
    http::{header, request::Parts, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{MethodFilter, MethodRouter},
    Router,
};
use shared::{Error, Result};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;
use turnstile::routing::{
    pattern, reply, Controller, CorsPolicy, Dispatcher, Reply, RequestContext,
};

/// Request bodies above this size are refused with 413
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Routes sharing one pattern shape
#[derive(Default)]
struct PatternRoutes {
    pattern: String,
    methods: HashSet<Method>,
    router: MethodRouter,
}

#[derive(Default)]
pub struct AxumDispatcher {
    // Keyed by pattern shape
    routes: BTreeMap<String, PatternRoutes>,
    preflight: Option<CorsPolicy>,
}

impl AxumDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `OPTIONS` on every pattern that has no explicit OPTIONS route
    pub fn with_preflight(mut self, cors: CorsPolicy) -> Self {
        self.preflight = Some(cors);
        self
    }

    pub fn into_router(self) -> Router {
        let mut router = Router::new();

        for entry in self.routes.into_values() {
            let mut method_router = entry.router;
            let has_options = entry.methods.contains(&Method::OPTIONS);

            if let (Some(cors), false) = (&self.preflight, has_options) {
                let cors = cors.clone();
                method_router = method_router.options(move |headers: HeaderMap| {
                    let cors = cors.clone();
                    async move {
                        let mut reply = reply::no_content();
                        cors.apply(headers.get(header::ORIGIN), &mut reply);
                        into_response(reply)
                    }
                });
            }

            router = router.route(&entry.pattern, method_router);
        }

        router
    }
}

impl Dispatcher for AxumDispatcher {
    fn register(
        &mut self,
        method: Method,
        pattern: &str,
        handler: Arc<dyn Controller>,
    ) -> Result<()> {
        pattern::validate(pattern)?;
        let filter = MethodFilter::try_from(method.clone())
            .map_err(|_| Error::Internal(format!("unsupported method {}", method)))?;

        let entry = self
            .routes
            .entry(pattern::shape(pattern))
            .or_insert_with(|| PatternRoutes {
                pattern: pattern.to_string(),
                ..Default::default()
            });

        // axum keys parameters by name, so one shape keeps one spelling
        if entry.pattern != pattern {
            return Err(if entry.methods.contains(&method) {
                Error::DuplicateRoute {
                    method: method.to_string(),
                    route: pattern.to_string(),
                }
            } else {
                Error::InvalidRoute(pattern.to_string())
            });
        }
        if entry.methods.contains(&method) {
            return Err(Error::DuplicateRoute {
                method: method.to_string(),
                route: pattern.to_string(),
            });
        }

        let endpoint = move |request: Request| {
            let handler = handler.clone();
            async move {
                match to_context(request).await {
                    Ok(ctx) => into_response(handler.handle(ctx).await),
                    Err(rejection) => rejection,
                }
            }
        };

        entry.router = std::mem::take(&mut entry.router).on(filter, endpoint);
        entry.methods.insert(method);

        Ok(())
    }
}

async fn to_context(request: Request) -> std::result::Result<RequestContext, Response> {
    let (mut parts, body) = request.into_parts();

    let params: HashMap<String, String> = RawPathParams::from_request_parts(&mut parts, &())
        .await
        .map(|raw| {
            raw.iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect()
        })
        .unwrap_or_default();

    let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| (StatusCode::PAYLOAD_TOO_LARGE, "413 Payload Too Large").into_response())?;

    let client_ip = client_ip(&parts);

    Ok(RequestContext::new(parts.method, parts.uri)
        .with_headers(parts.headers)
        .with_params(params)
        .with_body(body)
        .with_client_ip(client_ip))
}

/// Client IP from proxy headers, falling back to the socket peer
fn client_ip(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            parts
                .headers
                .get("X-Real-IP")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
        })
        .or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
}

fn into_response(reply: Reply) -> Response {
    reply.map(Body::from)
}
