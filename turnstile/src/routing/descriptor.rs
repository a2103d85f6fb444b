use super::controller::Controller;
use http::Method;
use std::fmt;
use std::sync::Arc;

/// Everything the auth gate needs to know about a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub module: String,
    pub name: String,
    pub method: Method,
    pub route: String,
    /// Check the admin's grant for `route`
    pub route_auth: bool,
    /// Require a verified token
    pub token_auth: bool,
}

/// A route as declared in the route table
#[derive(Clone)]
pub struct RouteDescriptor {
    pub module: String,
    pub name: String,
    pub method: Method,
    pub route: String,
    pub controller: Arc<dyn Controller>,
    pub route_auth: bool,
    pub token_auth: bool,
}

impl RouteDescriptor {
    pub fn new(
        module: impl Into<String>,
        name: impl Into<String>,
        method: Method,
        route: impl Into<String>,
        controller: Arc<dyn Controller>,
        route_auth: bool,
        token_auth: bool,
    ) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            method,
            route: route.into(),
            controller,
            route_auth,
            token_auth,
        }
    }

    /// Public-facing route: may require a token, never a route grant
    pub fn home(
        module: impl Into<String>,
        name: impl Into<String>,
        method: Method,
        route: impl Into<String>,
        controller: Arc<dyn Controller>,
        token_auth: bool,
    ) -> Self {
        Self::new(module, name, method, route, controller, false, token_auth)
    }

    /// The descriptor without its controller
    pub fn info(&self) -> RouteInfo {
        RouteInfo {
            module: self.module.clone(),
            name: self.name.clone(),
            method: self.method.clone(),
            route: self.route.clone(),
            route_auth: self.route_auth,
            token_auth: self.token_auth,
        }
    }
}

impl fmt::Debug for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("module", &self.module)
            .field("name", &self.name)
            .field("method", &self.method)
            .field("route", &self.route)
            .field("route_auth", &self.route_auth)
            .field("token_auth", &self.token_auth)
            .finish_non_exhaustive()
    }
}
