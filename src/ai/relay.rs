//! Forwards a conversation to the remote completion endpoint and
//! classifies what comes back.
//!
//! The relay is stateless. It prepends the system persona, makes one
//! non-streaming request (plus bounded retries for transient failures
//! when configured) and returns exactly one reply or one `RelayError`.

use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;
use thiserror::Error;

use crate::ai::chat::models::Turn;
use crate::ai::prompt;
use crate::core::AppConfig;
use crate::openai::{CompletionError, Message, Role, Sampling, completion};

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("no API key configured for the completion endpoint")]
    Config,
    #[error("completion endpoint responded with {status}")]
    Service { status: StatusCode, body: String },
    #[error("completion request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl RelayError {
    /// Status code to answer the browser with.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Service { status, .. } => *status,
            RelayError::Config | RelayError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User facing message, never includes remote details.
    pub fn public_message(&self) -> &'static str {
        match self {
            RelayError::Config => prompt::MISSING_API_KEY,
            RelayError::Service { .. } => prompt::SERVICE_FAILED,
            RelayError::Transport(_) => prompt::SERVER_FAILED,
        }
    }
}

impl From<CompletionError> for RelayError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::Status { status, body } => RelayError::Service { status, body },
            CompletionError::Transport(e) => RelayError::Transport(e),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub api_hostname: String,
    pub api_key: Option<String>,
    pub model: String,
    pub system_message: String,
    pub sampling: Sampling,
    pub timeout: Duration,
    pub max_retries: u32,
    // Delay before the first retry, doubled for each one after
    pub retry_backoff: Duration,
}

impl From<&AppConfig> for RelayConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_hostname: config.llm_api_hostname.clone(),
            api_key: config.llm_api_key.clone(),
            model: config.llm_model.clone(),
            system_message: config.system_message.clone(),
            sampling: Sampling::default(),
            timeout: config.llm_timeout,
            max_retries: config.llm_max_retries,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

/// Anything that can turn a conversation into the next assistant
/// reply. `Relay` is the real implementation, tests swap in fakes.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, turns: &[Turn]) -> Result<String, RelayError>;
}

pub struct Relay {
    config: RelayConfig,
}

impl Relay {
    pub fn new(config: RelayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    fn transcript(&self, turns: &[Turn]) -> Vec<Message> {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(Message::new(Role::System, &self.config.system_message));
        messages.extend(turns.iter().map(Message::from));
        messages
    }
}

#[async_trait]
impl Completion for Relay {
    async fn complete(&self, turns: &[Turn]) -> Result<String, RelayError> {
        let api_key = self.config.api_key.as_deref().ok_or(RelayError::Config)?;
        let messages = self.transcript(turns);

        let mut attempt = 0;
        loop {
            let result = completion(
                &messages,
                self.config.sampling,
                &self.config.api_hostname,
                api_key,
                &self.config.model,
                self.config.timeout,
            )
            .await;

            match result {
                Ok(resp) => {
                    let reply = match resp.first_content() {
                        Some(content) => content,
                        None => {
                            tracing::warn!("Completion had no content, using fallback reply");
                            prompt::EMPTY_REPLY
                        }
                    };
                    return Ok(reply.to_string());
                }
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    let delay = self.config.retry_backoff.saturating_mul(1u32 << attempt.min(16));
                    attempt += 1;
                    tracing::warn!(
                        "Completion attempt {} of {} failed, retrying in {:?}: {}",
                        attempt,
                        self.config.max_retries + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    match &e {
                        CompletionError::Status { status, body } => {
                            tracing::error!("Completion API error {}: {}", status, body)
                        }
                        CompletionError::Transport(err) => {
                            tracing::error!(
                                timeout = err.is_timeout(),
                                connect = err.is_connect(),
                                "Completion request failed: {:?}",
                                err
                            )
                        }
                    }
                    return Err(e.into());
                }
            }
        }
    }
}
