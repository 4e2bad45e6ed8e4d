use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReliabilityConfig {
    #[serde(default = "default_provider_retries")]
    pub provider_retries: u32,
    #[serde(default = "default_provider_backoff_ms")]
    pub provider_backoff_ms: u64,
    #[serde(default)]
    pub fallback_providers: Vec<String>,
    /// Upper bound on one generation call, retries included (default: 30s)
    #[serde(default = "default_generation_timeout_secs")]
    pub generation_timeout_secs: u64,
}

fn default_provider_retries() -> u32 {
    2
}

fn default_provider_backoff_ms() -> u64 {
    500
}

fn default_generation_timeout_secs() -> u64 {
    30
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        Self {
            provider_retries: default_provider_retries(),
            provider_backoff_ms: default_provider_backoff_ms(),
            fallback_providers: Vec::new(),
            generation_timeout_secs: default_generation_timeout_secs(),
        }
    }
}

impl ReliabilityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "reliability.generation_timeout_secs must be at least 1".into(),
            ));
        }
        if self.provider_retries > 10 {
            return Err(ConfigError::Validation(format!(
                "reliability.provider_retries must be at most 10, got {}",
                self.provider_retries
            )));
        }
        Ok(())
    }
}
