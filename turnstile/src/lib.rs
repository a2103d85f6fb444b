//! Route registration with token-authentication middleware.
//!
//! [`routing`] holds the route descriptors, the registry that hands them to a
//! [`routing::Dispatcher`], and the [`routing::AuthGate`] that wraps every
//! controller. [`auth`] holds the collaborators the gate consults: the store
//! pool, the session store, route grants, and admin accounts.

pub mod auth;
pub mod routing;
