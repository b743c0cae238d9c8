//! The core models for keeping a conversation with an LLM.
use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::openai;

/// Who authored a message. The system turn belongs to the relay and
/// can't be stored in a conversation.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl From<Role> for openai::Role {
    fn from(role: Role) -> Self {
        match role {
            Role::User => openai::Role::User,
            Role::Assistant => openai::Role::Assistant,
        }
    }
}

/// Identifier handed out in creation order by the owning conversation.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A role tagged unit of conversation as exchanged with the relay.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
        }
    }
}

impl From<&Turn> for openai::Message {
    fn from(turn: &Turn) -> Self {
        openai::Message::new(turn.role.into(), &turn.content)
    }
}

#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    // Display only
    pub timestamp: String,
}

impl ChatMessage {
    pub fn new(id: MessageId, role: Role, content: &str) -> Self {
        Self {
            id,
            role,
            content: content.to_string(),
            timestamp: display_time(Local::now()),
        }
    }

    pub fn to_turn(&self) -> Turn {
        Turn::new(self.role, &self.content)
    }
}

/// Hours and minutes the way the UI's `id-ID` locale prints them.
pub fn display_time(at: DateTime<Local>) -> String {
    at.format("%H.%M").to_string()
}
