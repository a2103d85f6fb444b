// Public API
pub mod admin;
pub mod auth_service;
pub mod authorizer;
pub mod claims;
pub mod defaults;
pub mod error;
pub mod moka_session_repository;
pub mod password;
pub mod pool;
pub mod repository;
pub mod session;
pub mod session_store;
pub mod sled_repository;
pub mod verifier;

// Re-export commonly used types
pub use admin::{Admin, RouteGrant, WILDCARD_ROUTE};
pub use auth_service::AuthService;
pub use authorizer::{GrantRouteAuthorizer, RouteAuthorizer};
pub use claims::Claims;
pub use error::AuthError;
pub use moka_session_repository::MokaSessionRepository;
pub use pool::{SemaphoreStorePool, StoreConnection, StorePool};
pub use repository::{AdminRepository, GrantRepository};
pub use session::{current_timestamp_ms, format_utc_time, generate_session_token, Session, SessionToken};
pub use session_store::{SessionRepository, SessionStore};
pub use sled_repository::{SledAdminRepository, SledGrantRepository};
pub use verifier::{extract_bearer_token, SessionTokenVerifier, TokenVerifier};
