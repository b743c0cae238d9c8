//! API routes module

pub mod chat;
pub mod sessions;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Stateless relay used by the browser
        .nest("/chat", chat::router())
        // In memory conversations
        .nest("/sessions", sessions::router())
}
