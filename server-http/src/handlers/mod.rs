pub mod admins;
pub mod auth;
pub mod grants;
pub mod health;

pub use admins::{list_admins, remove_admin};
pub use auth::{login, logout, logout_all, whoami};
pub use grants::{create_grant, list_grants, revoke_grant};
pub use health::health_check;
