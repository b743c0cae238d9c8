//! An editable, ordered log of chat messages.
//!
//! Two small state machines live here:
//!
//! - `Idle -> AwaitingResponse -> Idle` driven by `submit`/`save_edit`
//!   and `complete_request`
//! - `Idle -> Editing(id) -> Idle` driven by `begin_edit`,
//!   `cancel_edit` and `save_edit`
//!
//! Only one completion may be outstanding at a time. Anything that
//! would start a second one is rejected with `Rejection::Busy`, never
//! queued.
//!
//! Saving an edit truncates the log after the edited message. The
//! replies that followed answered content that no longer exists, so
//! they are discarded rather than left in place.

use chrono::Local;
use serde::Serialize;
use thiserror::Error;

use super::models::{ChatMessage, MessageId, Role, Turn, display_time};

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(tag = "state", content = "message_id", rename_all = "snake_case")]
pub enum ConversationState {
    Idle,
    Editing(MessageId),
    AwaitingResponse,
}

/// Why a mutation was refused. The log is untouched in every case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("message content is empty")]
    Empty,
    #[error("a reply is already being generated")]
    Busy,
    #[error("message not found")]
    NotFound,
    #[error("only user messages can be edited")]
    NotEditable,
}

/// Ephemeral edit mode state. Not part of the log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditDraft {
    pub id: MessageId,
    pub text: String,
}

#[derive(Default, Debug)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    next_id: u64,
    editing: Option<EditDraft>,
    awaiting_response: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.awaiting_response
    }

    pub fn state(&self) -> ConversationState {
        if self.awaiting_response {
            ConversationState::AwaitingResponse
        } else if let Some(draft) = &self.editing {
            ConversationState::Editing(draft.id)
        } else {
            ConversationState::Idle
        }
    }

    /// The log as the relay sees it.
    pub fn turns(&self) -> Vec<Turn> {
        self.messages.iter().map(ChatMessage::to_turn).collect()
    }

    /// Add a message to the end of the log. Always succeeds.
    pub fn append(&mut self, role: Role, content: &str) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(ChatMessage::new(id, role, content));
        id
    }

    /// Remove a single message. Unknown ids are ignored. Never starts a
    /// completion.
    pub fn delete(&mut self, id: MessageId) -> Option<ChatMessage> {
        let idx = self.messages.iter().position(|m| m.id == id)?;
        if self.editing.as_ref().is_some_and(|d| d.id == id) {
            self.editing = None;
        }
        Some(self.messages.remove(idx))
    }

    /// Enter edit mode for `id`, replacing any other edit in progress.
    /// Returns `false` if the message can't be edited.
    pub fn begin_edit(&mut self, id: MessageId, current_content: &str) -> bool {
        match self.get(id) {
            Some(msg) if msg.role == Role::User => {
                self.editing = Some(EditDraft {
                    id,
                    text: current_content.to_string(),
                });
                true
            }
            _ => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Append a user message and start awaiting the reply. Returns the
    /// turns to send to the relay.
    pub fn submit(&mut self, content: &str) -> Result<Vec<Turn>, Rejection> {
        if self.awaiting_response {
            return Err(Rejection::Busy);
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(Rejection::Empty);
        }

        self.append(Role::User, content);
        Ok(self.begin_request())
    }

    /// Replace the content of `id`, drop everything after it and start
    /// awaiting a fresh reply. Returns the turns to send to the relay.
    ///
    /// A rejected save keeps edit mode so the draft isn't lost.
    pub fn save_edit(&mut self, id: MessageId, new_content: &str) -> Result<Vec<Turn>, Rejection> {
        if self.awaiting_response {
            return Err(Rejection::Busy);
        }
        let new_content = new_content.trim();
        if new_content.is_empty() {
            return Err(Rejection::Empty);
        }
        let idx = self
            .messages
            .iter()
            .position(|m| m.id == id)
            .ok_or(Rejection::NotFound)?;
        if self.messages[idx].role != Role::User {
            return Err(Rejection::NotEditable);
        }

        self.messages.truncate(idx + 1);
        let edited = &mut self.messages[idx];
        edited.content = new_content.to_string();
        edited.timestamp = display_time(Local::now());
        self.editing = None;

        Ok(self.begin_request())
    }

    /// Finish the outstanding request by appending the assistant's
    /// reply. Also used for fallback replies when the relay failed.
    pub fn complete_request(&mut self, reply: &str) -> MessageId {
        self.awaiting_response = false;
        self.append(Role::Assistant, reply)
    }

    fn begin_request(&mut self) -> Vec<Turn> {
        self.awaiting_response = true;
        self.turns()
    }
}
