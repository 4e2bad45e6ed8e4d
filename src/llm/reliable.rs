use super::traits::{GenerateFuture, Provider};
use crate::error::LlmError;
use std::time::Duration;

const MAX_BACKOFF_MS: u64 = 10_000;

/// Provider wrapper with retry + fallback behavior.
///
/// Each provider gets `max_retries` extra attempts for retryable errors with
/// exponential backoff; non-retryable errors move straight to the next
/// provider. The last error is returned once every provider is exhausted.
pub struct ReliableProvider {
    providers: Vec<(String, Box<dyn Provider>)>,
    max_retries: u32,
    base_backoff_ms: u64,
}

impl ReliableProvider {
    pub fn new(
        providers: Vec<(String, Box<dyn Provider>)>,
        max_retries: u32,
        base_backoff_ms: u64,
    ) -> Self {
        Self {
            providers,
            max_retries,
            base_backoff_ms: base_backoff_ms.max(50),
        }
    }

    fn wait_for(err: &LlmError, backoff_ms: u64) -> Duration {
        let wait_ms = match err {
            LlmError::RateLimited {
                retry_after_secs, ..
            } => backoff_ms.max(retry_after_secs.saturating_mul(1000)),
            _ => backoff_ms,
        };
        Duration::from_millis(wait_ms.min(MAX_BACKOFF_MS))
    }
}

impl Provider for ReliableProvider {
    fn name(&self) -> &str {
        self.providers
            .first()
            .map_or("reliable", |(name, _)| name.as_str())
    }

    fn generate<'a>(&'a self, prompt: &'a str, max_tokens: u32) -> GenerateFuture<'a, String> {
        Box::pin(async move {
            let mut last_error = None;

            for (provider_name, provider) in &self.providers {
                let mut backoff_ms = self.base_backoff_ms;

                for attempt in 0..=self.max_retries {
                    match provider.generate(prompt, max_tokens).await {
                        Ok(text) => {
                            if attempt > 0 {
                                tracing::info!(
                                    provider = provider_name.as_str(),
                                    attempt,
                                    "Provider recovered after retries"
                                );
                            }
                            return Ok(text);
                        }
                        Err(e) => {
                            let retryable = e.is_retryable();
                            let wait = Self::wait_for(&e, backoff_ms);
                            tracing::warn!(
                                provider = provider_name.as_str(),
                                attempt = attempt + 1,
                                max_attempts = self.max_retries + 1,
                                retryable,
                                "Generation failed: {e}"
                            );
                            last_error = Some(e);

                            if !retryable {
                                break;
                            }
                            if attempt < self.max_retries {
                                tokio::time::sleep(wait).await;
                                backoff_ms = backoff_ms.saturating_mul(2).min(MAX_BACKOFF_MS);
                            }
                        }
                    }
                }

                tracing::warn!(
                    provider = provider_name.as_str(),
                    "Switching to fallback provider"
                );
            }

            Err(last_error.unwrap_or_else(|| LlmError::Unavailable {
                provider: "reliable".into(),
                message: "no providers configured".into(),
            }))
        })
    }
}
