use super::context::RequestContext;
use super::reply::Reply;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// A route's request handler
#[async_trait]
pub trait Controller: Send + Sync + 'static {
    async fn handle(&self, request: RequestContext) -> Reply;
}

/// Adapter so plain async closures can serve as controllers
pub struct FnController<F>(F);

#[async_trait]
impl<F, Fut> Controller for FnController<F>
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send + 'static,
{
    async fn handle(&self, request: RequestContext) -> Reply {
        (self.0)(request).await
    }
}

pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn Controller>
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send + 'static,
{
    Arc::new(FnController(f))
}
