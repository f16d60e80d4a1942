//! Shared type definitions.
//!
//! Newtype wrappers that make invalid states unrepresentable at API
//! boundaries: typed IDs, validated emails, and user claim sets.

pub mod claims;
pub mod email;
pub mod id;

pub use claims::ClaimSet;
pub use email::{Email, EmailError};
pub use id::{CharacterId, TokenId, UserId};
