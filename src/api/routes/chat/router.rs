//! Router for the chat API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};

use super::public;
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

/// Relay a whole conversation and answer with the next assistant
/// message. The browser owns the conversation, nothing is kept here.
async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<public::ChatRequest>,
) -> Response {
    let relay = state.read().expect("Unable to read shared state").relay.clone();

    match relay.complete(&payload.messages).await {
        Ok(message) => Json(public::ChatResponse::new(&message)).into_response(),
        Err(e) => {
            tracing::error!("Chat relay error: {}", e);
            e.into_response()
        }
    }
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(chat_handler))
}
