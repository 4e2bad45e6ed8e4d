use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `pitchcoach`.
///
/// Request-level failures (bad input, unknown session, broken invariants)
/// surface through this type. Per-dimension failures never do: the engine
/// folds those into a `failed` evaluation instead.
#[derive(Debug, Error)]
pub enum PitchError {
    // ── Input validation ────────────────────────────────────────────────
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("pitch is too large: {chars} characters (max {max})")]
    InputTooLarge { chars: usize, max: usize },

    // ── Text generation ─────────────────────────────────────────────────
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    #[error("score parse: {0}")]
    ScoreParse(#[from] ScoreParseError),

    // ── Session ─────────────────────────────────────────────────────────
    #[error("session: {0}")]
    Session(#[from] SessionError),

    // ── Config ──────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Prompt / Template ───────────────────────────────────────────────
    #[error("prompt: {0}")]
    Prompt(#[from] PromptError),

    #[error("submission cancelled before completion")]
    Cancelled,

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PitchError {
    /// True for errors caused by the caller's input rather than the engine.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::InputTooLarge { .. })
    }
}

// ─── LLM / Provider errors ──────────────────────────────────────────────────

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LlmError {
    #[error("provider {provider} unavailable: {message}")]
    Unavailable { provider: String, message: String },

    #[error("provider {provider} rate-limited (retry after {retry_after_secs}s)")]
    RateLimited {
        provider: String,
        retry_after_secs: u64,
    },

    #[error("provider {provider} authentication failed")]
    Auth { provider: String },

    #[error("provider {provider} rejected the request ({status}): {message}")]
    Rejected {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("generation timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("session generation budget exhausted ({limit} calls per window)")]
    BudgetExhausted { limit: u32 },
}

impl LlmError {
    /// Transient failures worth another attempt against the same provider.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. } | Self::RateLimited { .. } | Self::Timeout { .. }
        )
    }
}

// ─── Score parsing errors ───────────────────────────────────────────────────

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScoreParseError {
    #[error("response is empty")]
    Empty,

    #[error("no score found in response")]
    MissingScore,

    #[error("score {0} is outside 0-100")]
    OutOfRange(String),

    #[error("no critique found in response")]
    MissingCritique,
}

// ─── Session errors ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(String),

    #[error("revision out of order: expected sequence {expected}, got {got}")]
    OutOfOrder { expected: u32, got: u32 },

    #[error("revision {sequence} is incomplete: {detail}")]
    IncompleteRevision { sequence: u32, detail: String },

    #[error("session has no revisions yet")]
    Empty,

    #[error("session limit reached ({max} live sessions)")]
    Capacity { max: usize },
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid rubric: {0}")]
    Rubric(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Prompt / Template errors ───────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("template render failed: {0}")]
    Render(String),

    #[error("template not found: {0}")]
    NotFound(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, PitchError>;
