//! QuestVault Core - Shared types library.
//!
//! This crate provides common types used across all QuestVault components:
//! - `web` - Character sheet site (list, editor, sign-in)
//! - `admin` - Role assignment callable service
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and claim sets
//! - [`character`] - The character record schema and form-value coercion

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod character;
pub mod types;

pub use character::{
    Character, CharacterForm, VALUE_PLACEHOLDER, coerce_stat, split_entries, wounds_display,
};
pub use types::*;
