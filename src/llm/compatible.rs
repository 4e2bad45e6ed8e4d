use super::scrub::sanitize_api_error;
use super::traits::{GenerateFuture, Provider};
use super::types::{ChatRequest, ChatResponse, Message};
use crate::error::LlmError;
use reqwest::{Client, StatusCode, header};
use std::time::Duration;

/// Provider for any endpoint speaking the `OpenAI` chat-completions protocol.
pub struct OpenAiCompatibleProvider {
    name: String,
    endpoint: String,
    /// Pre-computed `"Bearer <key>"` header value (avoids `format!` per request).
    cached_auth_header: Option<String>,
    model: String,
    temperature: f64,
    client: Client,
}

pub(in crate::llm) fn build_provider_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Resolve the chat-completions URL from a base URL, tolerating bases that
/// already carry `/v1` or the full path.
pub fn chat_completions_url(base_url: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    if base.ends_with("/chat/completions") {
        base.to_string()
    } else if base.ends_with("/v1") {
        format!("{base}/chat/completions")
    } else {
        format!("{base}/v1/chat/completions")
    }
}

impl OpenAiCompatibleProvider {
    pub fn new(
        name: &str,
        base_url: &str,
        api_key: Option<&str>,
        model: &str,
        temperature: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            endpoint: chat_completions_url(base_url),
            cached_auth_header: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(|k| format!("Bearer {k}")),
            model: model.to_string(),
            temperature,
            client: build_provider_client(120),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn unavailable(&self, message: impl Into<String>) -> LlmError {
        LlmError::Unavailable {
            provider: self.name.clone(),
            message: message.into(),
        }
    }

    async fn error_from_response(&self, response: reqwest::Response) -> LlmError {
        let status = response.status();
        let retry_after_secs = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(1);
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read provider error body>".to_string());
        let message = sanitize_api_error(&body);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Auth {
                provider: self.name.clone(),
            },
            StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited {
                provider: self.name.clone(),
                retry_after_secs,
            },
            StatusCode::REQUEST_TIMEOUT => self.unavailable(format!("{status}: {message}")),
            s if s.is_client_error() => LlmError::Rejected {
                provider: self.name.clone(),
                status: s.as_u16(),
                message,
            },
            s => self.unavailable(format!("{s}: {message}")),
        }
    }

    async fn call_api(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let Some(auth_header) = self.cached_auth_header.as_deref() else {
            return Err(LlmError::Auth {
                provider: self.name.clone(),
            });
        };

        let request = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(header::AUTHORIZATION, auth_header)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.unavailable(sanitize_api_error(&e.to_string())))?;

        if !response.status().is_success() {
            return Err(self.error_from_response(response).await);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| self.unavailable(format!("malformed response body: {e}")))?;

        if let Some(usage) = &chat_response.usage {
            tracing::debug!(
                provider = self.name.as_str(),
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Generation completed"
            );
        }

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| self.unavailable("response contained no choices"))?;
        if choice.finish_reason.as_deref() == Some("length") {
            tracing::debug!(provider = self.name.as_str(), "Generation hit max_tokens");
        }
        Ok(choice.message.content.unwrap_or_default())
    }
}

impl Provider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate<'a>(&'a self, prompt: &'a str, max_tokens: u32) -> GenerateFuture<'a, String> {
        Box::pin(self.call_api(prompt, max_tokens))
    }
}
