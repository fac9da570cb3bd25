//! Quote generation: one prompt, one completion call, one extraction pass.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::CompletionService;
use crate::quotes::extractor::extract_quotes;
use crate::quotes::prompts::{build_user_prompt, QUOTE_SYSTEM};
use crate::quotes::request::GenerationRequest;

/// Generates up to `request.count` quotes. Upstream failures are not retried.
pub async fn generate_quotes(
    llm: &dyn CompletionService,
    request: &GenerationRequest,
) -> Result<Vec<String>, AppError> {
    let prompt = build_user_prompt(request);

    info!(
        "Generating {} quotes for occasion {:?}",
        request.count,
        request.effective_occasion()
    );

    let content = llm.complete(QUOTE_SYSTEM, &prompt).await?;
    let quotes = extract_quotes(&content, request.count);

    info!(
        "Extracted {}/{} quotes from {} chars of completion text",
        quotes.len(),
        request.count,
        content.len()
    );

    Ok(quotes)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::llm_client::LlmError;

    /// Completion stub that replays a canned reply and records the prompts it saw.
    pub(crate) struct StubCompletion {
        reply: Result<String, u16>,
        pub seen: Mutex<Vec<(String, String)>>,
    }

    impl StubCompletion {
        pub(crate) fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionService for StubCompletion {
        async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), prompt.to_string()));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "stubbed failure".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_generate_extracts_and_truncates() {
        let stub = StubCompletion::replying(r#"["One.", "Two.", "Three."]"#);
        let request = GenerationRequest {
            count: 2,
            ..Default::default()
        };

        let quotes = generate_quotes(&stub, &request).await.unwrap();
        assert_eq!(quotes, vec!["One.", "Two."]);
    }

    #[tokio::test]
    async fn test_generate_sends_system_and_user_prompts() {
        let stub = StubCompletion::replying("[]");
        let request = GenerationRequest {
            category: Some("Retirement".to_string()),
            ..Default::default()
        };

        generate_quotes(&stub, &request).await.unwrap();

        let seen = stub.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, QUOTE_SYSTEM);
        assert!(seen[0].1.contains("occasion: \"Retirement\""));
    }

    #[tokio::test]
    async fn test_generate_surfaces_upstream_failure() {
        let stub = StubCompletion::failing(429);
        let err = generate_quotes(&stub, &GenerationRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
        assert_eq!(stub.seen.lock().unwrap().len(), 1, "no retry on failure");
    }
}
