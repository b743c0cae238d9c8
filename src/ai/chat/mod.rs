pub mod conversation;
mod core;
pub mod models;

pub use self::conversation::{Conversation, ConversationState, EditDraft, Rejection};
pub use self::core::{Chat, ChatOutcome, resolve_reply};
