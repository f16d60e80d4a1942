//! Data models for the web crate.

pub mod header;
pub mod session;
pub mod user;

pub use header::HeaderView;
pub use session::CurrentUser;
pub use session::keys as session_keys;
pub use user::User;
