use super::admin::Admin;
use super::claims::Claims;
use chrono::{DateTime, Utc};

/// Session token type - a secure random string
pub type SessionToken = String;

/// Get current timestamp in milliseconds since Unix epoch
pub fn current_timestamp_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// Format a timestamp (ms since epoch) as ISO 8601 UTC string
pub fn format_utc_time(timestamp_ms: u64) -> String {
    let datetime = DateTime::from_timestamp_millis(timestamp_ms as i64).unwrap_or_default();
    datetime.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Session data stored in cache with tracking metadata
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SessionToken,
    pub admin_id: String,
    pub username: String,
    pub created_at: u64,           // UTC timestamp in milliseconds
    pub created_at_utc: String,    // Human-readable UTC time (ISO 8601)
    pub expires_at: u64,           // UTC timestamp in milliseconds
    pub last_accessed: u64,        // UTC timestamp in milliseconds
    pub last_accessed_utc: String, // Human-readable UTC time (ISO 8601)
    pub client_ip: Option<String>,
}

impl Session {
    /// Create a new session for an admin with the given token, TTL, and optional client IP
    pub fn new(token: SessionToken, admin: &Admin, ttl_ms: u64, client_ip: Option<String>) -> Self {
        let now = current_timestamp_ms();
        let now_utc = format_utc_time(now);

        Self {
            token,
            admin_id: admin.id.clone(),
            username: admin.username.clone(),
            created_at: now,
            created_at_utc: now_utc.clone(),
            expires_at: now.saturating_add(ttl_ms),
            last_accessed: now,
            last_accessed_utc: now_utc,
            client_ip,
        }
    }

    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }

    pub fn update_last_accessed(&mut self) {
        let now = current_timestamp_ms();
        self.last_accessed = now;
        self.last_accessed_utc = format_utc_time(now);
    }

    /// Get remaining time to live in milliseconds
    pub fn remaining_ttl_ms(&self) -> u64 {
        self.expires_at.saturating_sub(current_timestamp_ms())
    }

    /// The identity this session vouches for
    pub fn claims(&self) -> Claims {
        Claims {
            admin_id: self.admin_id.clone(),
            username: self.username.clone(),
            token: self.token.clone(),
            issued_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}

/// Generate a cryptographically secure random session token
pub fn generate_session_token() -> SessionToken {
    use rand::Rng;

    // 32 random bytes as hex (64 characters)
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
