use super::EngineConfig;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Worst-case JSON size of one character: a `\uXXXX\uXXXX` surrogate pair.
const MAX_ESCAPED_BYTES_PER_CHAR: usize = 12;
/// Room for the JSON envelope around the pitch.
const BODY_HEADROOM_BYTES: usize = 16 * 1024;

/// Smallest body limit that admits every pitch of up to `max_pitch_chars`,
/// however the client escapes it.
pub fn body_limit_for(max_pitch_chars: usize) -> usize {
    max_pitch_chars
        .saturating_mul(MAX_ESCAPED_BYTES_PER_CHAR)
        .saturating_add(BODY_HEADROOM_BYTES)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway port (default: 3000)
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    /// Gateway host (default: 127.0.0.1)
    #[serde(default = "default_gateway_host")]
    pub host: String,
    /// Whole-request timeout; must cover a full evaluation (default: 180s)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Request body limit in bytes (default: fits a maximal escaped pitch)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_gateway_port() -> u16 {
    3000
}

fn default_gateway_host() -> String {
    "127.0.0.1".into()
}

fn default_request_timeout_secs() -> u64 {
    180
}

fn default_max_body_bytes() -> usize {
    body_limit_for(EngineConfig::default().max_pitch_chars)
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            host: default_gateway_host(),
            request_timeout_secs: default_request_timeout_secs(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Validation("gateway.host must not be blank".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "gateway.request_timeout_secs must be at least 1".into(),
            ));
        }
        if self.max_body_bytes < 1024 {
            return Err(ConfigError::Validation(format!(
                "gateway.max_body_bytes must be at least 1024, got {}",
                self.max_body_bytes
            )));
        }
        Ok(())
    }
}
