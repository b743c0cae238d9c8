//! Router for the sessions API
//!
//! Each session owns one `Conversation`. The shared state lock is
//! never held while waiting on the relay, the conversation's busy flag
//! is what keeps a second request out in the meantime.
//!
//! The relay call runs on its own task so a client that disconnects
//! can't leave the conversation busy.

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use uuid::Uuid;

use super::public;
use crate::ai::chat::models::{MessageId, Turn};
use crate::ai::chat::{Conversation, resolve_reply};
use crate::ai::relay::{Completion, RelayError};
use crate::api::public::{ApiError, ErrorResponse};
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

fn session_not_found(id: &Uuid) -> Response {
    ErrorResponse::new(&format!("Session {} not found", id)).into_response_with(StatusCode::NOT_FOUND)
}

/// Start an empty conversation
async fn create_session(State(state): State<SharedState>) -> impl IntoResponse {
    let id = Uuid::new_v4();
    let conversation = Conversation::new();
    let resp = public::SessionResponse::new(id, &conversation);
    state
        .write()
        .expect("Unable to write shared state")
        .sessions
        .insert(id, conversation);

    tracing::debug!("Created session {}", id);
    (StatusCode::CREATED, Json(resp))
}

async fn get_session(State(state): State<SharedState>, Path(id): Path<Uuid>) -> Response {
    let shared_state = state.read().expect("Unable to read shared state");
    match shared_state.sessions.get(&id) {
        Some(conversation) => Json(public::SessionResponse::new(id, conversation)).into_response(),
        None => session_not_found(&id),
    }
}

/// End a session, dropping its conversation
async fn delete_session(State(state): State<SharedState>, Path(id): Path<Uuid>) -> Response {
    let removed = state
        .write()
        .expect("Unable to write shared state")
        .sessions
        .remove(&id);
    match removed {
        Some(_) => {
            tracing::debug!("Ended session {}", id);
            StatusCode::NO_CONTENT.into_response()
        }
        None => session_not_found(&id),
    }
}

/// Run `mutate` against the session's conversation under the lock and
/// hand back the turns to relay along with the relay itself.
fn start_request<F>(state: &SharedState, id: &Uuid, mutate: F) -> Result<(Vec<Turn>, Arc<dyn Completion>), Response>
where
    F: FnOnce(&mut Conversation) -> Result<Vec<Turn>, crate::ai::chat::Rejection>,
{
    let mut shared_state = state.write().expect("Unable to write shared state");
    let relay = shared_state.relay.clone();
    let conversation = shared_state
        .sessions
        .get_mut(id)
        .ok_or_else(|| session_not_found(id))?;
    let turns = mutate(conversation).map_err(IntoResponse::into_response)?;
    Ok((turns, relay))
}

/// Wait for the reply, append it (or the apology) and respond with the
/// updated session.
async fn finish_request(
    state: SharedState,
    id: Uuid,
    turns: Vec<Turn>,
    relay: Arc<dyn Completion>,
) -> Response {
    // Detached from the handler so the conversation always leaves the
    // busy state, even when the client goes away mid-request
    let task = tokio::spawn(async move {
        let (reply, error) = resolve_reply(relay.as_ref(), &turns).await;

        let mut shared_state = state.write().expect("Unable to write shared state");
        match shared_state.sessions.get_mut(&id) {
            Some(conversation) => {
                conversation.complete_request(&reply);
                let resp = public::SessionResponse::new(id, conversation)
                    .with_error(error.as_ref().map(RelayError::public_message));
                Json(resp).into_response()
            }
            None => session_not_found(&id),
        }
    });

    match task.await {
        Ok(resp) => resp,
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Submit a new user message and wait for the reply
async fn post_message(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<public::MessageRequest>,
) -> Response {
    let (turns, relay) = match start_request(&state, &id, |c| c.submit(&payload.content)) {
        Ok(started) => started,
        Err(resp) => return resp,
    };
    finish_request(state, id, turns, relay).await
}

/// Save an edit, discarding everything after the message, and wait
/// for a fresh reply
async fn edit_message(
    State(state): State<SharedState>,
    Path((id, message_id)): Path<(Uuid, u64)>,
    Json(payload): Json<public::MessageRequest>,
) -> Response {
    let message_id = MessageId(message_id);
    let (turns, relay) = match start_request(&state, &id, |c| {
        c.save_edit(message_id, &payload.content)
    }) {
        Ok(started) => started,
        Err(resp) => return resp,
    };
    finish_request(state, id, turns, relay).await
}

/// Delete a single message. Unknown message ids are ignored.
async fn delete_message(
    State(state): State<SharedState>,
    Path((id, message_id)): Path<(Uuid, u64)>,
) -> Response {
    let mut shared_state = state.write().expect("Unable to write shared state");
    match shared_state.sessions.get_mut(&id) {
        Some(conversation) => {
            if conversation.delete(MessageId(message_id)).is_none() {
                tracing::debug!("Message {} not in session {}", message_id, id);
            }
            Json(public::SessionResponse::new(id, conversation)).into_response()
        }
        None => session_not_found(&id),
    }
}

/// Create the sessions router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(create_session))
        .route("/{id}", get(get_session).delete(delete_session))
        .route("/{id}/messages", post(post_message))
        .route(
            "/{id}/messages/{message_id}",
            put(edit_message).delete(delete_message),
        )
}
