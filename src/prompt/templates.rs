use super::engine::TeraEngine;
use crate::error::PromptError;
use crate::rubric::RubricDimension;
use tera::Context;

pub const EXTRACT_TEMPLATE: &str = "extract";
pub const SCORE_TEMPLATE: &str = "score";

const EXTRACT: &str = r#"You are helping analyse a startup pitch.

Find the passage of the pitch below that addresses this dimension:
{{ label }}: {{ description }}

Rules:
- Copy the passage exactly as it appears in the pitch, without edits.
- Reply with a single JSON object: {"excerpt": "<passage>", "confidence": <0.0-1.0>}
- If the pitch does not address {{ label }} at all, reply with NONE.

PITCH:
{{ pitch }}
"#;

const SCORE: &str = r#"You are a seasoned early-stage investor reviewing one part of a startup pitch.
Be objective and honest. Do not sugarcoat.

Dimension: {{ label }}
What it covers: {{ description }}
{% if guidance %}
Scoring guidance (0-100):
{{ guidance }}
{% endif %}
Pitch excerpt for this dimension:
"""
{{ excerpt }}
"""

Reply with a single JSON object and nothing else:
{"score": <integer 0-100>, "critique": "<two or three sentences: what works, what is missing, what to change first>"}
"#;

/// The engine's prompt set, compiled once at startup.
pub struct PromptLibrary {
    engine: TeraEngine,
}

impl PromptLibrary {
    pub fn new() -> Result<Self, PromptError> {
        let mut engine = TeraEngine::new();
        engine.add_template(EXTRACT_TEMPLATE, EXTRACT)?;
        engine.add_template(SCORE_TEMPLATE, SCORE)?;
        Ok(Self { engine })
    }

    /// Prompt asking the model to locate the passage for `dimension`.
    pub fn extraction(&self, dimension: &RubricDimension, pitch: &str) -> Result<String, PromptError> {
        let mut ctx = dimension_context(dimension);
        ctx.insert("pitch", pitch);
        self.engine.render(EXTRACT_TEMPLATE, &ctx)
    }

    /// Prompt asking the model to score `excerpt` against `dimension`.
    pub fn scoring(&self, dimension: &RubricDimension, excerpt: &str) -> Result<String, PromptError> {
        let mut ctx = dimension_context(dimension);
        ctx.insert("guidance", &dimension.guidance);
        ctx.insert("excerpt", excerpt);
        self.engine.render(SCORE_TEMPLATE, &ctx)
    }
}

fn dimension_context(dimension: &RubricDimension) -> Context {
    let mut ctx = Context::new();
    ctx.insert("label", &dimension.label);
    ctx.insert("description", &dimension.description);
    ctx
}
