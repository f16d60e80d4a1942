//! QuestVault admin library.
//!
//! Exposes the role assignment service as a library for testing.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
