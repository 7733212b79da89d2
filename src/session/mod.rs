//! Session/auth state and the controller driving it.

pub mod controller;
pub mod reset_link;
pub mod state;

pub use controller::{AuthController, GENERIC_AUTH_ERROR};
pub use state::{SessionState, SharedSessionStore};
