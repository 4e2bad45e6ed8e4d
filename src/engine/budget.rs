use crate::config::{EngineConfig, ReliabilityConfig};
use crate::error::LlmError;
use crate::llm::Provider;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// Sliding-window call budget.
#[derive(Debug)]
pub struct CallBudget {
    calls: Mutex<Vec<Instant>>,
    max_calls: u32,
    window: Duration,
}

impl CallBudget {
    pub fn new(max_calls: u32, window: Duration) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            max_calls,
            window,
        }
    }

    /// Record a call if the window has room for it.
    pub fn try_record(&self) -> bool {
        let mut calls = self
            .calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        prune(&mut calls, self.window);
        if calls.len() >= usize::try_from(self.max_calls).unwrap_or(usize::MAX) {
            return false;
        }
        calls.push(Instant::now());
        true
    }

    /// Calls within the current window.
    pub fn used(&self) -> usize {
        let mut calls = self
            .calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        prune(&mut calls, self.window);
        calls.len()
    }

    pub fn limit(&self) -> u32 {
        self.max_calls
    }
}

fn prune(calls: &mut Vec<Instant>, window: Duration) {
    if let Some(cutoff) = Instant::now().checked_sub(window) {
        calls.retain(|t| *t > cutoff);
    }
}

/// Per-session admission for generation calls: bounded concurrency, a call
/// budget and a per-call deadline.
#[derive(Debug)]
pub struct CallGate {
    permits: Semaphore,
    budget: CallBudget,
    timeout: Duration,
}

impl CallGate {
    pub fn new(max_concurrent: usize, budget: CallBudget, timeout: Duration) -> Self {
        Self {
            permits: Semaphore::new(max_concurrent.clamp(1, Semaphore::MAX_PERMITS)),
            budget,
            timeout,
        }
    }

    pub fn from_config(engine: &EngineConfig, reliability: &ReliabilityConfig) -> Self {
        Self::new(
            engine.max_concurrent_calls,
            CallBudget::new(
                engine.max_calls_per_window,
                Duration::from_secs(engine.budget_window_secs),
            ),
            Duration::from_secs(reliability.generation_timeout_secs),
        )
    }

    pub fn budget(&self) -> &CallBudget {
        &self.budget
    }

    /// Run one generation call through the gate.
    pub async fn generate(
        &self,
        provider: &dyn Provider,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| LlmError::Unavailable {
                provider: provider.name().to_string(),
                message: "call gate closed".into(),
            })?;

        if !self.budget.try_record() {
            tracing::warn!(
                limit = self.budget.limit(),
                "Generation budget exhausted for session"
            );
            return Err(LlmError::BudgetExhausted {
                limit: self.budget.limit(),
            });
        }

        match tokio::time::timeout(self.timeout, provider.generate(prompt, max_tokens)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout {
                after_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }
}
