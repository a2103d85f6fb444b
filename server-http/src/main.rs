use server_http::{build_gate, build_router, AppState};
use shared::config::Config;
use std::error::Error;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use turnstile::auth::{
    defaults::ensure_default_admin, AuthService, MokaSessionRepository, SemaphoreStorePool,
    SessionStore, SledAdminRepository, SledGrantRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Turnstile HTTP Server...");

    // Load environment variables from .env file (if exists)
    match dotenvy::dotenv() {
        Ok(_) => info!("Loaded environment variables from .env file"),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    let config = Config::from_env();

    let auth_base_path = Path::new(&config.data_dir).join(".turnstile");
    if let Err(e) = std::fs::create_dir_all(&auth_base_path) {
        warn!("Failed to create {}: {}", auth_base_path.display(), e);
    }

    // Initialize repositories
    info!("Initializing authentication system...");
    let admin_repo = Arc::new(SledAdminRepository::new(auth_base_path.join("admins.sled"))?);
    let grants = Arc::new(SledGrantRepository::new(auth_base_path.join("grants.sled"))?);

    let session_repository = Arc::new(MokaSessionRepository::new(
        config.max_sessions,
        Some(config.session_ttl),
    ));
    let sessions = Arc::new(SessionStore::new(session_repository));
    let auth_service = Arc::new(AuthService::new(
        admin_repo,
        sessions.clone(),
        config.session_ttl,
    ));

    let admin = ensure_default_admin(
        &auth_service,
        grants.as_ref(),
        &config.admin_username,
        &config.admin_password,
    )
    .await?;
    info!("Default admin ready: {} ({})", admin.username, admin.id);

    let pool = Arc::new(SemaphoreStorePool::new(
        sessions,
        grants.clone(),
        config.store_pool_size,
        config.store_acquire_timeout,
    ));
    info!(
        "Store pool ready: {} connections, {:?} acquire timeout",
        pool.size(),
        config.store_acquire_timeout
    );

    let state = AppState::new(auth_service, grants);
    let gate = build_gate(pool.clone(), &config);
    let router = build_router(&state, gate)?;

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!("HTTP Server listening on http://{}", address);
    info!(
        "Try: curl -X POST -u {}:<password> http://localhost:{}/auth/login",
        config.admin_username, config.http_port
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    pool.close();
    info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }

    info!("Shutting down gracefully...");
}
