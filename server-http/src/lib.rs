pub mod dispatcher;
pub mod dto;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod validation;

// Re-export key types
pub use dispatcher::AxumDispatcher;
pub use routes::{build_gate, build_router, route_table};
pub use state::AppState;
