// shared/src/lib.rs

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("not found")]
    NotFound,
    #[error("route already registered: {method} {route}")]
    DuplicateRoute { method: String, route: String },
    #[error("invalid route pattern: {0:?}")]
    InvalidRoute(String),
    #[error("store pool unavailable: {0}")]
    PoolUnavailable(String),
    #[error("internal: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod config;
