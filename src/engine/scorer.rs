use super::budget::CallGate;
use super::text::first_json_object;
use super::types::{Evaluation, Span};
use crate::config::EngineConfig;
use crate::error::ScoreParseError;
use crate::llm::{Provider, sanitize_api_error};
use crate::prompt::PromptLibrary;
use crate::rubric::RubricDimension;

/// Score and critique parsed from a model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreReply {
    pub score: u8,
    pub critique: String,
}

pub struct Scorer<'a> {
    prompts: &'a PromptLibrary,
    config: &'a EngineConfig,
}

impl<'a> Scorer<'a> {
    pub fn new(prompts: &'a PromptLibrary, config: &'a EngineConfig) -> Self {
        Self { prompts, config }
    }

    /// Evaluate one span. Never fails: problems become a `failed` evaluation.
    pub async fn score(
        &self,
        span: Span,
        dimension: &RubricDimension,
        provider: &dyn Provider,
        gate: &CallGate,
    ) -> Evaluation {
        if span.is_absent() {
            return Evaluation::missing(
                span,
                self.config.missing_score,
                missing_critique(dimension),
            );
        }

        let prompt = match self.prompts.scoring(dimension, &span.text) {
            Ok(prompt) => prompt,
            Err(e) => return Evaluation::failed(span, e.to_string()),
        };

        let reply = match gate
            .generate(provider, &prompt, self.config.score_max_tokens)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                let reason = sanitize_api_error(&e.to_string());
                tracing::warn!(
                    dimension = dimension.id.as_str(),
                    "Scoring call failed: {reason}"
                );
                return Evaluation::failed(span, reason);
            }
        };

        match parse_score_reply(&reply) {
            Ok(ScoreReply { score, critique }) => Evaluation::scored(span, score, critique),
            Err(e) => {
                tracing::warn!(
                    dimension = dimension.id.as_str(),
                    "Unparsable scoring reply: {e}"
                );
                Evaluation::failed(span, format!("unparsable model reply: {e}"))
            }
        }
    }
}

fn missing_critique(dimension: &RubricDimension) -> String {
    let hint = dimension.missing_hint.trim();
    if hint.is_empty() {
        format!("{} is missing from the pitch.", dimension.label)
    } else {
        format!("{} is missing from the pitch. {hint}", dimension.label)
    }
}

/// Parse `{"score": n, "critique": "..."}` (bare, fenced or inside prose) or
/// `SCORE: n` / `CRITIQUE: ...` lines.
pub fn parse_score_reply(reply: &str) -> Result<ScoreReply, ScoreParseError> {
    let reply = reply.trim();
    if reply.is_empty() {
        return Err(ScoreParseError::Empty);
    }

    if let Some(value) = first_json_object(reply) {
        return parse_json_reply(&value);
    }
    parse_line_reply(reply)
}

fn parse_json_reply(value: &serde_json::Value) -> Result<ScoreReply, ScoreParseError> {
    let score = match value.get("score") {
        Some(serde_json::Value::Number(n)) => {
            let raw = n.to_string();
            validate_score(n.as_f64(), &raw)?
        }
        Some(serde_json::Value::String(s)) => parse_score_text(s)?,
        _ => return Err(ScoreParseError::MissingScore),
    };

    let critique = value
        .get("critique")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or(ScoreParseError::MissingCritique)?;

    Ok(ScoreReply {
        score,
        critique: critique.to_string(),
    })
}

fn parse_line_reply(reply: &str) -> Result<ScoreReply, ScoreParseError> {
    let mut score = None;
    let mut critique: Vec<&str> = Vec::new();
    let mut in_critique = false;

    for line in reply.lines() {
        let line = line.trim().trim_start_matches(['*', '#', '-']).trim();
        if let Some(rest) = strip_label(line, "score") {
            score = Some(parse_score_text(rest)?);
            in_critique = false;
        } else if let Some(rest) = strip_label(line, "critique") {
            critique = vec![rest];
            in_critique = true;
        } else if in_critique && !line.is_empty() {
            critique.push(line);
        }
    }

    let score = score.ok_or(ScoreParseError::MissingScore)?;
    let critique = critique.join(" ").trim().to_string();
    if critique.is_empty() {
        return Err(ScoreParseError::MissingCritique);
    }
    Ok(ScoreReply { score, critique })
}

/// `label:` prefix, case-insensitive, with optional `**` around the label.
fn strip_label<'l>(line: &'l str, label: &str) -> Option<&'l str> {
    let head = line.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }
    let rest = line[label.len()..].trim_start_matches('*').trim_start();
    rest.strip_prefix(':')
        .map(|r| r.trim().trim_start_matches('*').trim())
}

/// Leading number of `85`, `85/100` or `72.6 out of 100`.
fn parse_score_text(text: &str) -> Result<u8, ScoreParseError> {
    let text = text.trim();
    let numeric: String = text
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        .collect();
    if numeric.is_empty() {
        return Err(ScoreParseError::MissingScore);
    }
    validate_score(numeric.parse::<f64>().ok(), text)
}

fn validate_score(value: Option<f64>, raw: &str) -> Result<u8, ScoreParseError> {
    let value = value.ok_or_else(|| ScoreParseError::OutOfRange(raw.to_string()))?;
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(ScoreParseError::OutOfRange(raw.to_string()));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let score = value.round() as u8;
    Ok(score)
}
