use super::compatible::OpenAiCompatibleProvider;
use super::reliable::ReliableProvider;
use super::traits::Provider;
use crate::config::Config;

/// Resolve API key for a provider from config and environment variables.
///
/// Resolution order:
/// 1. Explicitly provided `api_key` parameter (trimmed, filtered if empty)
/// 2. Provider-specific environment variable (e.g., `OPENAI_API_KEY`)
/// 3. Generic fallback `PITCHCOACH_API_KEY`
pub fn resolve_api_key(name: &str, explicit_api_key: Option<&str>) -> Option<String> {
    if let Some(key) = explicit_api_key.map(str::trim).filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }

    let provider_env = match name {
        "openai" => Some("OPENAI_API_KEY"),
        "openrouter" => Some("OPENROUTER_API_KEY"),
        "groq" => Some("GROQ_API_KEY"),
        "together" | "together-ai" => Some("TOGETHER_API_KEY"),
        _ => None,
    };

    provider_env
        .into_iter()
        .chain(std::iter::once("PITCHCOACH_API_KEY"))
        .find_map(|env_var| {
            std::env::var(env_var)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
}

/// Maps well-known provider names to `(display_name, base_url)`.
pub fn compatible_provider_spec(name: &str) -> Option<(&'static str, &'static str)> {
    let spec = match name {
        "openai" => ("OpenAI", "https://api.openai.com"),
        "openrouter" => ("OpenRouter", "https://openrouter.ai/api"),
        "groq" => ("Groq", "https://api.groq.com/openai"),
        "together" | "together-ai" => ("Together AI", "https://api.together.xyz"),
        _ => return None,
    };
    Some(spec)
}

/// Create a boxed [`Provider`] by name.
///
/// Supported providers:
/// - `"openai"`, `"openrouter"`, `"groq"`, `"together"` presets
/// - `"custom:<base_url>"` for any other chat-completions endpoint
pub fn create_provider(
    name: &str,
    api_key: Option<&str>,
    model: &str,
    temperature: f64,
) -> anyhow::Result<Box<dyn Provider>> {
    let resolved_key = resolve_api_key(name, api_key);
    let api_key = resolved_key.as_deref();

    if let Some((display_name, base_url)) = compatible_provider_spec(name) {
        return Ok(Box::new(OpenAiCompatibleProvider::new(
            display_name,
            base_url,
            api_key,
            model,
            temperature,
        )));
    }

    if let Some(base_url) = name.strip_prefix("custom:") {
        if base_url.trim().is_empty() {
            anyhow::bail!("Custom provider requires a URL. Format: custom:https://your-api.com");
        }
        return Ok(Box::new(OpenAiCompatibleProvider::new(
            "Custom",
            base_url,
            api_key,
            model,
            temperature,
        )));
    }

    anyhow::bail!(
        "Unknown provider: {name}. Supported: openai, openrouter, groq, together.\n\
         Tip: Use \"custom:https://your-api.com\" for OpenAI-compatible endpoints."
    )
}

/// Primary provider plus configured fallbacks, wrapped in retry/backoff.
///
/// Invalid fallbacks are logged and skipped; an invalid primary is an error.
pub fn create_resilient_provider(config: &Config) -> anyhow::Result<Box<dyn Provider>> {
    let primary_name = config.provider_name();
    let model = config.model_name();
    let reliability = &config.reliability;
    let api_key = config.api_key.as_deref();

    let mut providers: Vec<(String, Box<dyn Provider>)> =
        Vec::with_capacity(1 + reliability.fallback_providers.len());
    providers.push((
        primary_name.to_string(),
        create_provider(primary_name, api_key, model, config.default_temperature)?,
    ));

    for fallback in &reliability.fallback_providers {
        if providers.iter().any(|(name, _)| name == fallback) {
            continue;
        }

        // The configured key belongs to the primary; fallbacks use env vars.
        match create_provider(fallback, None, model, config.default_temperature) {
            Ok(provider) => providers.push((fallback.clone(), provider)),
            Err(e) => {
                tracing::warn!(
                    fallback_provider = fallback.as_str(),
                    "Ignoring invalid fallback provider: {e}"
                );
            }
        }
    }

    Ok(Box::new(ReliableProvider::new(
        providers,
        reliability.provider_retries,
        reliability.provider_backoff_ms,
    )))
}
