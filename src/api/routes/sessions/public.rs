//! Public types for the sessions API
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ai::chat::models::ChatMessage;
use crate::ai::chat::{Conversation, ConversationState};

#[derive(Deserialize, Serialize)]
pub struct MessageRequest {
    pub content: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub state: ConversationState,
    pub messages: Vec<ChatMessage>,
    // Set when the last reply is a fallback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionResponse {
    pub fn new(id: Uuid, conversation: &Conversation) -> Self {
        Self {
            id,
            state: conversation.state(),
            messages: conversation.messages().to_vec(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: Option<&str>) -> Self {
        self.error = error.map(String::from);
        self
    }
}
