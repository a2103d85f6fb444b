use serde::{Deserialize, Serialize};

/// Identity extracted from a verified token.
///
/// Built per request by a [`TokenVerifier`](super::TokenVerifier) and carried
/// on the request context until the request completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub admin_id: String,
    pub username: String,
    pub token: String,
    /// UTC timestamp in milliseconds
    pub issued_at: u64,
    /// UTC timestamp in milliseconds
    pub expires_at: u64,
}
