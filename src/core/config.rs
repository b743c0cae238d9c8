use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::ai::prompt::SYSTEM_PERSONA;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub llm_api_hostname: String,
    // Optional so a missing key surfaces per request instead of at
    // start up
    pub llm_api_key: Option<String>,
    pub llm_model: String,
    pub llm_timeout: Duration,
    pub llm_max_retries: u32,
    pub system_message: String,
    pub web_ui_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let llm_api_hostname = env::var("AITIARA_LLM_HOST")
            .unwrap_or_else(|_| "https://api.groq.com/openai".to_string());
        let llm_api_key = env::var("GROQ_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let llm_model = env::var("AITIARA_LLM_MODEL")
            .unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string());
        let llm_timeout = Duration::from_secs(env_or("AITIARA_LLM_TIMEOUT_SECS", 60));
        let llm_max_retries = env_or("AITIARA_LLM_MAX_RETRIES", 0);
        let system_message =
            env::var("AITIARA_SYSTEM_MESSAGE").unwrap_or_else(|_| SYSTEM_PERSONA.to_string());
        let web_ui_path =
            env::var("AITIARA_WEB_UI_PATH").unwrap_or_else(|_| "./web-ui/src".to_string());

        Self {
            llm_api_hostname,
            llm_api_key,
            llm_model,
            llm_timeout,
            llm_max_retries,
            system_message,
            web_ui_path,
        }
    }
}

/// Parse an env var, falling back to `default` when it is unset or
/// malformed.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid value for {}: {:?}", name, raw);
            default
        }),
        Err(_) => default,
    }
}
