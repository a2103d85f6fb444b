use std::time::Duration;
use tracing::warn;

pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub data_dir: String,
    pub admin_username: String,
    pub admin_password: String,
    pub allowed_origins: Vec<String>,
    pub session_ttl: Duration,
    pub max_sessions: Option<u64>,
    pub store_pool_size: usize,
    pub store_acquire_timeout: Duration,
}

impl Config {
    const DEFAULT_HOST: &str = "0.0.0.0";
    const DEFAULT_HTTP_PORT: u16 = 8080;
    const DEFAULT_ADMIN_USERNAME: &str = "admin";
    const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
    const DEFAULT_DATA_DIR: &str = "./data";
    const DEFAULT_SESSION_TTL_SECS: u64 = 3600;
    const DEFAULT_STORE_POOL_SIZE: usize = 32;
    const DEFAULT_STORE_ACQUIRE_TIMEOUT_MS: u64 = 500;

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source (env, tests, ...)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        Self {
            host: lookup("TURNSTILE_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            http_port: lookup("TURNSTILE_HTTP_PORT")
                .and_then(|v| v.trim().parse::<u16>().ok())
                .unwrap_or(Self::DEFAULT_HTTP_PORT),
            data_dir: lookup("TURNSTILE_DATA_DIR")
                .unwrap_or_else(|| Self::DEFAULT_DATA_DIR.to_string()),
            admin_username: lookup("TURNSTILE_ADMIN_USERNAME")
                .unwrap_or_else(|| Self::DEFAULT_ADMIN_USERNAME.to_string()),
            admin_password: lookup("TURNSTILE_ADMIN_PASSWORD").unwrap_or_else(|| {
                warn!("TURNSTILE_ADMIN_PASSWORD not set, using default password 'admin123'");
                warn!("Please change the default admin password immediately!");
                Self::DEFAULT_ADMIN_PASSWORD.to_string()
            }),
            allowed_origins: lookup("TURNSTILE_ALLOWED_ORIGINS")
                .unwrap_or_else(|| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            session_ttl: Duration::from_secs(parsed(
                "TURNSTILE_SESSION_TTL_SECS",
                Self::DEFAULT_SESSION_TTL_SECS,
            )),
            max_sessions: lookup("TURNSTILE_MAX_SESSIONS").and_then(|v| v.trim().parse().ok()),
            store_pool_size: (parsed(
                "TURNSTILE_STORE_POOL_SIZE",
                Self::DEFAULT_STORE_POOL_SIZE as u64,
            ) as usize)
                .max(1),
            store_acquire_timeout: Duration::from_millis(parsed(
                "TURNSTILE_STORE_ACQUIRE_TIMEOUT_MS",
                Self::DEFAULT_STORE_ACQUIRE_TIMEOUT_MS,
            )),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}
