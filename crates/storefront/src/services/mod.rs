//! External service integrations.

pub mod login;

pub use login::{AuthError, LoginService};
