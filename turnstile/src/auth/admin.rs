use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Route pattern that grants access to every route
pub const WILDCARD_ROUTE: &str = "*";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    pub fn new(username: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Permission for one admin to call one route pattern
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteGrant {
    pub admin_id: String,
    pub route: String,
    pub granted_at: DateTime<Utc>,
}

impl RouteGrant {
    pub fn new(admin_id: String, route: String) -> Self {
        Self {
            admin_id,
            route,
            granted_at: Utc::now(),
        }
    }

    /// Whether this grant covers the given route pattern
    pub fn covers(&self, route: &str) -> bool {
        self.route == WILDCARD_ROUTE || self.route == route
    }
}
