use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::ai::chat::Conversation;
use crate::ai::relay::{Completion, Relay, RelayConfig};
use crate::core::AppConfig;

pub struct AppState {
    pub config: AppConfig,
    pub relay: Arc<dyn Completion>,
    // In memory only, gone when the process exits
    pub sessions: HashMap<Uuid, Conversation>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let relay = Arc::new(Relay::new(RelayConfig::from(&config)));
        Self::with_relay(config, relay)
    }

    pub fn with_relay(config: AppConfig, relay: Arc<dyn Completion>) -> Self {
        Self {
            config,
            relay,
            sessions: HashMap::new(),
        }
    }
}
