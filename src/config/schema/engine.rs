use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Upper bound for `max_concurrent_calls`.
pub const MAX_CONCURRENT_CALLS: usize = 64;

/// Tuning for the evaluation pipeline and per-session resource limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Spans below this confidence are escalated for extraction (default: 0.5)
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
    /// Ask the model to extract spans the heuristics missed (default: true)
    #[serde(default = "default_true")]
    pub escalate_extraction: bool,
    /// Score given to a dimension absent from the pitch (default: 0)
    #[serde(default)]
    pub missing_score: u8,
    /// Longest accepted pitch, in characters (default: 20000)
    #[serde(default = "default_max_pitch_chars")]
    pub max_pitch_chars: usize,
    #[serde(default = "default_extract_max_tokens")]
    pub extract_max_tokens: u32,
    #[serde(default = "default_score_max_tokens")]
    pub score_max_tokens: u32,
    /// Concurrent generation calls per session, 1..=64 (default: 4)
    #[serde(default = "default_max_concurrent_calls")]
    pub max_concurrent_calls: usize,
    /// Generation calls allowed per session within the budget window
    #[serde(default = "default_max_calls_per_window")]
    pub max_calls_per_window: u32,
    #[serde(default = "default_budget_window_secs")]
    pub budget_window_secs: u64,
    #[serde(default = "default_max_next_actions")]
    pub max_next_actions: usize,
    /// Overall score at or above which a complete pitch is called fundable
    #[serde(default = "default_fundable_threshold")]
    pub fundable_threshold: f64,
    /// Live sessions a single process will hold (default: 256)
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_confidence_threshold() -> f64 {
    0.5
}

fn default_true() -> bool {
    true
}

fn default_max_pitch_chars() -> usize {
    20_000
}

fn default_extract_max_tokens() -> u32 {
    300
}

fn default_score_max_tokens() -> u32 {
    400
}

fn default_max_concurrent_calls() -> usize {
    4
}

fn default_max_calls_per_window() -> u32 {
    120
}

fn default_budget_window_secs() -> u64 {
    3600
}

fn default_max_next_actions() -> usize {
    3
}

fn default_fundable_threshold() -> f64 {
    70.0
}

fn default_max_sessions() -> usize {
    256
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            escalate_extraction: true,
            missing_score: 0,
            max_pitch_chars: default_max_pitch_chars(),
            extract_max_tokens: default_extract_max_tokens(),
            score_max_tokens: default_score_max_tokens(),
            max_concurrent_calls: default_max_concurrent_calls(),
            max_calls_per_window: default_max_calls_per_window(),
            budget_window_secs: default_budget_window_secs(),
            max_next_actions: default_max_next_actions(),
            fundable_threshold: default_fundable_threshold(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.confidence_threshold > 0.0 && self.confidence_threshold <= 1.0) {
            return Err(ConfigError::Validation(format!(
                "engine.confidence_threshold must be within (0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.missing_score > 100 {
            return Err(ConfigError::Validation(format!(
                "engine.missing_score must be within 0..=100, got {}",
                self.missing_score
            )));
        }
        if !(0.0..=100.0).contains(&self.fundable_threshold) {
            return Err(ConfigError::Validation(format!(
                "engine.fundable_threshold must be within 0..=100, got {}",
                self.fundable_threshold
            )));
        }
        if self.max_pitch_chars == 0 {
            return Err(ConfigError::Validation(
                "engine.max_pitch_chars must be at least 1".into(),
            ));
        }
        if !(1..=MAX_CONCURRENT_CALLS).contains(&self.max_concurrent_calls) {
            return Err(ConfigError::Validation(format!(
                "engine.max_concurrent_calls must be within 1..={MAX_CONCURRENT_CALLS}, got {}",
                self.max_concurrent_calls
            )));
        }
        if self.max_calls_per_window == 0 || self.budget_window_secs == 0 {
            return Err(ConfigError::Validation(
                "engine call budget and window must be non-zero".into(),
            ));
        }
        if self.max_sessions == 0 {
            return Err(ConfigError::Validation(
                "engine.max_sessions must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
