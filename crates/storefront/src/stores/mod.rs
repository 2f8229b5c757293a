//! Auth and cart state stores.
//!
//! Both stores are synchronous: mutations run to completion behind an
//! `RwLock` and are immediately observable by the next reader. Locks are
//! never held across awaits.

pub mod auth;
pub mod cart;

pub use auth::AuthStore;
pub use cart::CartStore;
