//! Character sheet routes.
//!
//! The list view lives at the site root; creation, editing, and deletion
//! are plain form posts that redirect back to the list.

pub mod edit;
pub mod list;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the character routes router (nested under `/characters`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(edit::create))
        .route("/new", get(edit::new_page))
        .route("/{id}", post(edit::update))
        .route("/{id}/edit", get(edit::edit_page))
        .route("/{id}/delete", post(edit::delete))
}
