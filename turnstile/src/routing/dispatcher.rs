use super::controller::Controller;
use http::Method;
use shared::Result;
use std::sync::Arc;

/// The path-matching component routes are registered with
pub trait Dispatcher {
    fn register(
        &mut self,
        method: Method,
        pattern: &str,
        handler: Arc<dyn Controller>,
    ) -> Result<()>;
}
