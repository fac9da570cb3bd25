use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::{CompletionService, LlmClient, LlmError};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no completion credential is configured. Generate requests
    /// then fail with a configuration error.
    pub llm: Option<Arc<dyn CompletionService>>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let llm = match &config.openai_api_key {
            Some(key) => {
                let client = LlmClient::new(key.clone(), config.openai_base_url.clone())?;
                Some(Arc::new(client) as Arc<dyn CompletionService>)
            }
            None => None,
        };
        Ok(Self { llm })
    }
}
