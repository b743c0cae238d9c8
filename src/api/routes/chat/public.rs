//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::ai::chat::models::Turn;

#[derive(Deserialize, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<Turn>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChatResponse {
    pub message: String,
}

impl ChatResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.into(),
        }
    }
}
