pub mod access_log;
pub mod context;
pub mod controller;
pub mod cors;
pub mod descriptor;
pub mod dispatcher;
pub mod middleware;
pub mod pattern;
pub mod registry;
pub mod reply;

pub use access_log::{AccessLogger, TracingAccessLogger};
pub use context::RequestContext;
pub use controller::{handler_fn, Controller};
pub use cors::CorsPolicy;
pub use descriptor::{RouteDescriptor, RouteInfo};
pub use dispatcher::Dispatcher;
pub use middleware::AuthGate;
pub use registry::RouteRegistry;
pub use reply::Reply;
