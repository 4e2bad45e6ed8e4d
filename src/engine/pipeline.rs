use super::budget::CallGate;
use super::decomposer::Decomposer;
use super::scorer::Scorer;
use super::types::Evaluation;
use crate::config::{Config, EngineConfig, ReliabilityConfig};
use crate::error::{PitchError, Result};
use crate::llm::{Provider, create_resilient_provider};
use crate::prompt::PromptLibrary;
use crate::rubric::Rubric;
use futures_util::future::join_all;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Runs one pitch through decomposition and scoring.
///
/// Shared by every session; per-session limits live in the [`CallGate`]
/// passed to [`Evaluator::evaluate`].
pub struct Evaluator {
    provider: Arc<dyn Provider>,
    rubric: Arc<Rubric>,
    prompts: PromptLibrary,
    engine: EngineConfig,
    reliability: ReliabilityConfig,
}

impl Evaluator {
    pub fn new(
        provider: Arc<dyn Provider>,
        rubric: Rubric,
        engine: EngineConfig,
        reliability: ReliabilityConfig,
    ) -> Result<Self> {
        Ok(Self {
            provider,
            rubric: Arc::new(rubric),
            prompts: PromptLibrary::new()?,
            engine,
            reliability,
        })
    }

    /// Evaluator backed by the configured provider chain.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider: Arc<dyn Provider> = Arc::from(create_resilient_provider(config)?);
        Ok(Self::new(
            provider,
            config.build_rubric()?,
            config.engine.clone(),
            config.reliability.clone(),
        )?)
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.engine
    }

    /// Fresh per-session gate built from the engine limits.
    pub fn new_gate(&self) -> CallGate {
        CallGate::from_config(&self.engine, &self.reliability)
    }

    /// Trimmed pitch text, or the input error rejecting it.
    pub fn validate_pitch<'p>(&self, pitch: &'p str) -> Result<&'p str> {
        let trimmed = pitch.trim();
        if trimmed.is_empty() {
            return Err(PitchError::InvalidInput("pitch is empty".into()));
        }
        let chars = trimmed.chars().count();
        if chars > self.engine.max_pitch_chars {
            return Err(PitchError::InputTooLarge {
                chars,
                max: self.engine.max_pitch_chars,
            });
        }
        Ok(trimmed)
    }

    /// One evaluation per rubric dimension, in rubric order.
    ///
    /// Per-dimension failures are folded into `failed` evaluations. When
    /// `cancel` fires, in-flight calls are dropped and `Cancelled` returned.
    pub async fn evaluate(
        &self,
        pitch: &str,
        gate: &CallGate,
        cancel: &CancellationToken,
    ) -> Result<Vec<Evaluation>> {
        let pitch = self.validate_pitch(pitch)?;

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::info!("Evaluation cancelled");
                Err(PitchError::Cancelled)
            }
            result = self.run(pitch, gate) => result,
        }
    }

    async fn run(&self, pitch: &str, gate: &CallGate) -> Result<Vec<Evaluation>> {
        let provider = self.provider.as_ref();
        let decomposition = Decomposer::new(&self.rubric, &self.prompts, &self.engine)
            .decompose(pitch, provider, gate)
            .await?;

        let scorer = Scorer::new(&self.prompts, &self.engine);
        let evaluations = join_all(
            decomposition
                .into_spans()
                .into_iter()
                .zip(self.rubric.iter())
                .map(|(span, dimension)| scorer.score(span, dimension, provider, gate)),
        )
        .await;

        let failed = evaluations.iter().filter(|e| !e.is_evaluated()).count();
        let missing = evaluations.iter().filter(|e| e.is_missing()).count();
        tracing::info!(
            dimensions = evaluations.len(),
            missing,
            failed,
            budget_used = gate.budget().used(),
            "Pitch evaluated"
        );
        Ok(evaluations)
    }
}
