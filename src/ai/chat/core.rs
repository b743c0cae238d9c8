use std::sync::Arc;

use super::conversation::{Conversation, Rejection};
use super::models::{MessageId, Turn};
use crate::ai::prompt;
use crate::ai::relay::{Completion, RelayError};

/// Result of a turn that reached the relay. A reply is always
/// appended, `error` says whether it was the real one.
#[derive(Debug)]
pub struct ChatOutcome {
    pub reply_id: MessageId,
    pub error: Option<RelayError>,
}

impl ChatOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// The next assistant reply for `turns`. Relay failures are logged and
/// replaced by the apology text so the caller always has something to
/// append.
pub async fn resolve_reply(
    relay: &dyn Completion,
    turns: &[Turn],
) -> (String, Option<RelayError>) {
    match relay.complete(turns).await {
        Ok(reply) => (reply, None),
        Err(e) => {
            tracing::error!("Chat reply failed: {}", e);
            (prompt::APOLOGY.to_string(), Some(e))
        }
    }
}

/// A single chat session: one conversation plus the relay it talks
/// to.
///
/// Use this when the caller can hold `&mut Chat` across the relay
/// call (e.g. the terminal chat). Shared state behind a lock should
/// use the two phase `Conversation::submit` / `complete_request` with
/// `resolve_reply` in between instead.
pub struct Chat {
    conversation: Conversation,
    relay: Arc<dyn Completion>,
}

impl Chat {
    pub fn new(relay: Arc<dyn Completion>) -> Self {
        Self {
            conversation: Conversation::new(),
            relay,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// For mutations that never reach the relay: delete and edit mode.
    pub fn conversation_mut(&mut self) -> &mut Conversation {
        &mut self.conversation
    }

    /// Send a new user message and append the reply.
    pub async fn submit(&mut self, text: &str) -> Result<ChatOutcome, Rejection> {
        let turns = self.conversation.submit(text)?;
        Ok(self.reply(turns).await)
    }

    /// Rewrite an earlier user message, discard what followed it and
    /// append a fresh reply.
    pub async fn save_edit(&mut self, id: MessageId, text: &str) -> Result<ChatOutcome, Rejection> {
        let turns = self.conversation.save_edit(id, text)?;
        Ok(self.reply(turns).await)
    }

    async fn reply(&mut self, turns: Vec<Turn>) -> ChatOutcome {
        let (reply, error) = resolve_reply(self.relay.as_ref(), &turns).await;
        let reply_id = self.conversation.complete_request(&reply);
        ChatOutcome { reply_id, error }
    }
}
