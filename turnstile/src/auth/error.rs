use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Admin not found")]
    AdminNotFound,

    #[error("Admin already exists")]
    AdminAlreadyExists,

    #[error("Password does not meet strength requirements")]
    WeakPassword,

    #[error("Invalid route pattern: {0}")]
    InvalidRoute(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Password hashing error: {0}")]
    PasswordHashError(String),
}

impl From<sled::Error> for AuthError {
    fn from(err: sled::Error) -> Self {
        AuthError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::SerializationError(err.to_string())
    }
}

impl From<shared::Error> for AuthError {
    fn from(err: shared::Error) -> Self {
        AuthError::StorageError(err.to_string())
    }
}
