use super::descriptor::{RouteDescriptor, RouteInfo};
use super::dispatcher::Dispatcher;
use super::middleware::AuthGate;
use super::pattern;
use http::Method;
use shared::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Registers route descriptors with a dispatcher, each behind the auth gate.
///
/// A `(method, pattern)` pair may be registered once; a second registration
/// is a startup error. Patterns are compared by shape, so `/items/{id}` and
/// `/items/{name}` are the same pattern.
pub struct RouteRegistry<D: Dispatcher> {
    dispatcher: D,
    gate: Arc<AuthGate>,
    routes: Vec<RouteInfo>,
    registered: HashSet<(Method, String)>,
    // shape -> pattern as first written
    spellings: HashMap<String, String>,
}

impl<D: Dispatcher> RouteRegistry<D> {
    pub fn new(dispatcher: D, gate: Arc<AuthGate>) -> Self {
        Self {
            dispatcher,
            gate,
            routes: Vec::new(),
            registered: HashSet::new(),
            spellings: HashMap::new(),
        }
    }

    /// Wrap and register each descriptor in order.
    ///
    /// Stops at the first invalid or duplicate descriptor; the ones before it
    /// stay registered.
    pub fn set_route_handles(&mut self, descriptors: Vec<RouteDescriptor>) -> Result<&mut Self> {
        for descriptor in descriptors {
            pattern::validate(&descriptor.route)?;

            let shape = pattern::shape(&descriptor.route);
            let key = (descriptor.method.clone(), shape.clone());
            if self.registered.contains(&key) {
                return Err(Error::DuplicateRoute {
                    method: descriptor.method.to_string(),
                    route: descriptor.route,
                });
            }

            // Same shape under another method must keep the parameter names
            if let Some(spelling) = self.spellings.get(&shape) {
                if *spelling != descriptor.route {
                    return Err(Error::InvalidRoute(descriptor.route));
                }
            }

            let info = descriptor.info();
            let wrapped = self.gate.wrap(info.clone(), descriptor.controller);

            self.dispatcher
                .register(info.method.clone(), &info.route, wrapped)?;

            debug!(
                module = %info.module,
                name = %info.name,
                token_auth = info.token_auth,
                route_auth = info.route_auth,
                "registered {} {}",
                info.method,
                info.route
            );

            self.registered.insert(key);
            self.spellings.entry(shape).or_insert_with(|| info.route.clone());
            self.routes.push(info);
        }

        Ok(self)
    }

    /// Registered routes in registration order
    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn into_dispatcher(self) -> D {
        self.dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{
        GrantRouteAuthorizer, MokaSessionRepository, SemaphoreStorePool, SessionStore,
        SessionTokenVerifier, SledGrantRepository,
    };
    use crate::routing::access_log::TracingAccessLogger;
    use crate::routing::context::RequestContext;
    use crate::routing::controller::{handler_fn, Controller};
    use crate::routing::reply;
    use http::{StatusCode, Uri};
    use std::collections::HashMap;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Exact-match table standing in for a real router
    #[derive(Default)]
    struct TableDispatcher {
        table: HashMap<(Method, String), Arc<dyn Controller>>,
        order: Vec<(Method, String)>,
    }

    impl Dispatcher for TableDispatcher {
        fn register(
            &mut self,
            method: Method,
            pattern: &str,
            handler: Arc<dyn Controller>,
        ) -> Result<()> {
            self.order.push((method.clone(), pattern.to_string()));
            self.table.insert((method, pattern.to_string()), handler);
            Ok(())
        }
    }

    impl TableDispatcher {
        async fn dispatch(&self, method: Method, path: &'static str) -> Option<reply::Reply> {
            let handler = self.table.get(&(method.clone(), path.to_string()))?;
            Some(
                handler
                    .handle(RequestContext::new(method, Uri::from_static(path)))
                    .await,
            )
        }
    }

    fn gate(temp_dir: &TempDir) -> Arc<AuthGate> {
        let sessions = Arc::new(SessionStore::new(Arc::new(
            MokaSessionRepository::with_defaults(),
        )));
        let grants =
            Arc::new(SledGrantRepository::new(temp_dir.path().join("grants.sled")).unwrap());
        let pool = Arc::new(SemaphoreStorePool::new(
            sessions,
            grants,
            4,
            Duration::from_millis(50),
        ));
        Arc::new(AuthGate::new(
            pool,
            Arc::new(SessionTokenVerifier),
            Arc::new(GrantRouteAuthorizer),
            Arc::new(TracingAccessLogger),
        ))
    }

    fn body(text: &'static str) -> Arc<dyn Controller> {
        handler_fn(move |_| async move { reply::text(StatusCode::OK, text) })
    }

    #[tokio::test]
    async fn test_registers_wrapped_handlers_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = RouteRegistry::new(TableDispatcher::default(), gate(&temp_dir));

        registry
            .set_route_handles(vec![
                RouteDescriptor::home("site", "index", Method::GET, "/", body("index"), false),
                RouteDescriptor::new("admin", "drop", Method::DELETE, "/admin", body("drop"), true, true),
            ])
            .unwrap()
            .set_route_handles(vec![RouteDescriptor::home(
                "site",
                "about",
                Method::GET,
                "/about",
                body("about"),
                false,
            )])
            .unwrap();

        let names: Vec<_> = registry.routes().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["index", "drop", "about"]);

        let dispatcher = registry.into_dispatcher();
        assert_eq!(dispatcher.order.len(), 3);

        let public = dispatcher.dispatch(Method::GET, "/about").await.unwrap();
        assert_eq!(public.status(), StatusCode::OK);
        assert_eq!(public.body().as_ref(), b"about");
        // Wrapped: the gate stamped CORS headers
        assert!(public
            .headers()
            .contains_key(http::header::ACCESS_CONTROL_ALLOW_ORIGIN));

        let guarded = dispatcher.dispatch(Method::DELETE, "/admin").await.unwrap();
        assert_eq!(guarded.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = RouteRegistry::new(TableDispatcher::default(), gate(&temp_dir));

        let result = registry.set_route_handles(vec![
            RouteDescriptor::home("site", "first", Method::GET, "/dup", body("first"), false),
            RouteDescriptor::home("site", "second", Method::GET, "/dup", body("second"), false),
            RouteDescriptor::home("site", "after", Method::GET, "/after", body("after"), false),
        ]);

        match result {
            Err(Error::DuplicateRoute { method, route }) => {
                assert_eq!(method, "GET");
                assert_eq!(route, "/dup");
            }
            _ => panic!("expected duplicate route error"),
        }

        // The first registration stands; nothing after the duplicate was added
        assert_eq!(registry.routes().len(), 1);
        let first = registry.dispatcher().dispatch(Method::GET, "/dup").await.unwrap();
        assert_eq!(first.body().as_ref(), b"first");
        assert!(registry.dispatcher().dispatch(Method::GET, "/after").await.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_across_calls_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = RouteRegistry::new(TableDispatcher::default(), gate(&temp_dir));

        registry
            .set_route_handles(vec![RouteDescriptor::home(
                "site", "a", Method::GET, "/a", body("a"), false,
            )])
            .unwrap();
        let again = registry.set_route_handles(vec![RouteDescriptor::home(
            "site", "a2", Method::GET, "/a", body("a2"), true,
        )]);

        assert!(matches!(again, Err(Error::DuplicateRoute { .. })));
    }

    #[tokio::test]
    async fn test_same_pattern_different_methods_is_allowed() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = RouteRegistry::new(TableDispatcher::default(), gate(&temp_dir));

        registry
            .set_route_handles(vec![
                RouteDescriptor::home("items", "list", Method::GET, "/items", body("list"), false),
                RouteDescriptor::home("items", "create", Method::POST, "/items", body("create"), false),
            ])
            .unwrap();

        assert_eq!(registry.routes().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_patterns_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = RouteRegistry::new(TableDispatcher::default(), gate(&temp_dir));

        for pattern in ["", "items", "/with space", "/items/:id", "/items/{id"] {
            let result = registry.set_route_handles(vec![RouteDescriptor::home(
                "items", "bad", Method::GET, pattern, body("bad"), false,
            )]);
            assert!(matches!(result, Err(Error::InvalidRoute(_))), "{pattern:?}");
        }

        assert!(registry.routes().is_empty());
    }

    #[tokio::test]
    async fn test_renamed_parameter_is_a_duplicate() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = RouteRegistry::new(TableDispatcher::default(), gate(&temp_dir));

        let result = registry.set_route_handles(vec![
            RouteDescriptor::home("items", "by id", Method::GET, "/items/{id}", body("id"), false),
            RouteDescriptor::home("items", "by name", Method::GET, "/items/{name}", body("name"), false),
        ]);

        match result {
            Err(Error::DuplicateRoute { method, route }) => {
                assert_eq!(method, "GET");
                assert_eq!(route, "/items/{name}");
            }
            _ => panic!("expected duplicate route error"),
        }
        assert_eq!(registry.routes().len(), 1);
    }

    #[tokio::test]
    async fn test_parameter_names_must_agree_across_methods() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = RouteRegistry::new(TableDispatcher::default(), gate(&temp_dir));

        registry
            .set_route_handles(vec![
                RouteDescriptor::home("items", "get", Method::GET, "/items/{id}", body("get"), false),
                RouteDescriptor::home("items", "put", Method::PUT, "/items/{id}", body("put"), false),
            ])
            .unwrap();

        let result = registry.set_route_handles(vec![RouteDescriptor::home(
            "items",
            "delete",
            Method::DELETE,
            "/items/{key}",
            body("delete"),
            false,
        )]);

        assert!(matches!(result, Err(Error::InvalidRoute(route)) if route == "/items/{key}"));
        assert_eq!(registry.routes().len(), 2);
    }
}
