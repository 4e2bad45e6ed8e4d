use super::super::{EngineConfig, GatewayConfig, ReliabilityConfig, RubricConfig, body_limit_for};
use crate::error::ConfigError;
use crate::rubric::Rubric;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed at load time, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    pub api_key: Option<String>,
    pub default_provider: Option<String>,
    pub default_model: Option<String>,
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,

    #[serde(default)]
    pub reliability: ReliabilityConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub rubric: RubricConfig,
}

fn default_temperature() -> f64 {
    0.3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            api_key: None,
            default_provider: Some(DEFAULT_PROVIDER.into()),
            default_model: Some(DEFAULT_MODEL.into()),
            default_temperature: default_temperature(),
            reliability: ReliabilityConfig::default(),
            engine: EngineConfig::default(),
            gateway: GatewayConfig::default(),
            rubric: RubricConfig::default(),
        }
    }
}

impl Config {
    pub fn provider_name(&self) -> &str {
        self.default_provider
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PROVIDER)
    }

    pub fn model_name(&self) -> &str {
        self.default_model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MODEL)
    }

    /// The active rubric: the configured one, or the built-in default.
    pub fn build_rubric(&self) -> Result<Rubric, ConfigError> {
        self.rubric.build()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(ConfigError::Validation(format!(
                "default_temperature must be within 0.0..=2.0, got {}",
                self.default_temperature
            )));
        }
        self.reliability.validate()?;
        self.engine.validate()?;
        self.gateway.validate()?;
        let needed = body_limit_for(self.engine.max_pitch_chars);
        if self.gateway.max_body_bytes < needed {
            return Err(ConfigError::Validation(format!(
                "gateway.max_body_bytes ({}) is too small for engine.max_pitch_chars ({}): \
                 need at least {needed}",
                self.gateway.max_body_bytes, self.engine.max_pitch_chars
            )));
        }
        self.build_rubric()?;
        Ok(())
    }
}
