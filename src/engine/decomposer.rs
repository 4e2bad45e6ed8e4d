use super::budget::CallGate;
use super::text::{
    compile_keywords, first_json_object, keyword_hits, parse_heading, sentences, trim_range, words,
};
use super::types::{Decomposition, Span, SpanSource};
use crate::config::EngineConfig;
use crate::error::{PitchError, Result};
use crate::llm::{Provider, scrub_secret_patterns};
use crate::prompt::PromptLibrary;
use crate::rubric::{Rubric, RubricDimension};
use futures_util::future::join_all;
use serde::Deserialize;
use std::collections::BTreeSet;

const SECTION_CONFIDENCE: f64 = 0.95;
const DEFAULT_GENERATED_CONFIDENCE: f64 = 0.6;

/// Segments a pitch into one span per rubric dimension.
pub struct Decomposer<'a> {
    rubric: &'a Rubric,
    prompts: &'a PromptLibrary,
    config: &'a EngineConfig,
}

impl<'a> Decomposer<'a> {
    pub fn new(rubric: &'a Rubric, prompts: &'a PromptLibrary, config: &'a EngineConfig) -> Self {
        Self {
            rubric,
            prompts,
            config,
        }
    }

    /// Section headings, then keywords. Never calls the model.
    pub fn heuristic(&self, pitch: &str) -> Result<Decomposition> {
        if pitch.trim().is_empty() {
            return Err(PitchError::InvalidInput("pitch is empty".into()));
        }

        let mut spans = section_spans(pitch, self.rubric);
        let sentences: Vec<(usize, usize, Vec<String>)> = sentences(pitch)
            .into_iter()
            .map(|(start, end)| (start, end, words(&pitch[start..end])))
            .collect();

        for (slot, dimension) in spans.iter_mut().zip(self.rubric) {
            if slot.is_none() {
                *slot = keyword_span(pitch, &sentences, dimension);
            }
        }

        Ok(Decomposition::new(
            spans
                .into_iter()
                .zip(self.rubric)
                .map(|(span, dimension)| span.unwrap_or_else(|| Span::absent(&dimension.id)))
                .collect(),
        ))
    }

    /// Heuristic pass, then escalation of weak dimensions to the model.
    pub async fn decompose(
        &self,
        pitch: &str,
        provider: &dyn Provider,
        gate: &CallGate,
    ) -> Result<Decomposition> {
        let heuristic = self.heuristic(pitch)?;
        if !self.config.escalate_extraction {
            return Ok(heuristic);
        }

        let threshold = self.config.confidence_threshold;
        let escalations = heuristic
            .into_spans()
            .into_iter()
            .zip(self.rubric)
            .map(|(span, dimension)| async move {
                if span.confidence >= threshold {
                    return span;
                }
                match self.extract(pitch, dimension, provider, gate).await {
                    Some(generated) if generated.confidence > span.confidence => {
                        tracing::debug!(
                            dimension = dimension.id.as_str(),
                            confidence = generated.confidence,
                            "Using model-extracted span"
                        );
                        generated
                    }
                    _ => span,
                }
            });

        Ok(Decomposition::new(join_all(escalations).await))
    }

    /// Ask the model for the passage covering `dimension`. Any failure keeps
    /// the heuristic span, so this only logs.
    async fn extract(
        &self,
        pitch: &str,
        dimension: &RubricDimension,
        provider: &dyn Provider,
        gate: &CallGate,
    ) -> Option<Span> {
        let prompt = match self.prompts.extraction(dimension, pitch) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!(dimension = dimension.id.as_str(), "Extraction prompt failed: {e}");
                return None;
            }
        };

        let reply = match gate
            .generate(provider, &prompt, self.config.extract_max_tokens)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(
                    dimension = dimension.id.as_str(),
                    "Extraction call failed: {}",
                    scrub_secret_patterns(&e.to_string())
                );
                return None;
            }
        };

        let (excerpt, confidence) = parse_extraction_reply(&reply)?;
        let Some(start) = pitch.find(excerpt.as_str()) else {
            tracing::debug!(
                dimension = dimension.id.as_str(),
                "Discarding extracted excerpt not found verbatim in pitch"
            );
            return None;
        };
        Span::from_range(
            &dimension.id,
            pitch,
            start,
            start + excerpt.len(),
            confidence,
            SpanSource::Generated,
        )
    }
}

#[derive(Deserialize)]
struct ExtractionReply {
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    confidence: Option<f64>,
}

/// `NONE`, or `{"excerpt": "...", "confidence": 0..1}`. Returns the trimmed
/// excerpt and its confidence.
pub(crate) fn parse_extraction_reply(reply: &str) -> Option<(String, f64)> {
    let trimmed = reply.trim();
    if trimmed
        .trim_end_matches('.')
        .eq_ignore_ascii_case("none")
    {
        return None;
    }

    let parsed: ExtractionReply = serde_json::from_value(first_json_object(trimmed)?).ok()?;
    let excerpt = parsed.excerpt.trim();
    if excerpt.is_empty() {
        return None;
    }
    let confidence = parsed
        .confidence
        .filter(|c| c.is_finite())
        .unwrap_or(DEFAULT_GENERATED_CONFIDENCE)
        .clamp(0.0, 1.0);
    Some((excerpt.to_string(), confidence))
}

/// Sections opened by headings naming a dimension. The first non-empty
/// section per dimension wins.
fn section_spans(pitch: &str, rubric: &Rubric) -> Vec<Option<Span>> {
    let lookup: Vec<(String, usize)> = rubric
        .iter()
        .enumerate()
        .flat_map(|(idx, dimension)| dimension.headings().map(move |h| (h, idx)))
        .collect();

    // (dimension index, line start, body start)
    let mut markers = Vec::new();
    let mut offset = 0;
    for line in pitch.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        if let Some((title, body)) = parse_heading(content)
            && let Some((_, idx)) = lookup.iter().find(|(heading, _)| *heading == title)
        {
            markers.push((*idx, offset, offset + body));
        }
        offset += line.len();
    }

    let mut spans: Vec<Option<Span>> = vec![None; rubric.len()];
    for (i, &(idx, _, body_start)) in markers.iter().enumerate() {
        if spans[idx].is_some() {
            continue;
        }
        let end = markers.get(i + 1).map_or(pitch.len(), |&(_, line_start, _)| line_start);
        spans[idx] = trim_range(pitch, body_start, end).and_then(|(start, end)| {
            Span::from_range(
                &rubric.dimensions()[idx].id,
                pitch,
                start,
                end,
                SECTION_CONFIDENCE,
                SpanSource::Section,
            )
        });
    }
    spans
}

/// Best run of adjacent keyword-matching sentences for one dimension.
fn keyword_span(
    pitch: &str,
    sentences: &[(usize, usize, Vec<String>)],
    dimension: &RubricDimension,
) -> Option<Span> {
    let keywords = compile_keywords(&dimension.keywords);
    if keywords.is_empty() {
        return None;
    }

    let mut best: Option<(usize, usize, usize)> = None;
    let mut run: Option<(usize, usize, BTreeSet<usize>)> = None;

    let mut close = |run: &mut Option<(usize, usize, BTreeSet<usize>)>| {
        if let Some((start, end, hits)) = run.take()
            && best.is_none_or(|(_, _, best_hits)| hits.len() > best_hits)
        {
            best = Some((start, end, hits.len()));
        }
    };

    for (start, end, sentence_words) in sentences {
        let hits = keyword_hits(&keywords, sentence_words);
        if hits.is_empty() {
            close(&mut run);
            continue;
        }
        match run.as_mut() {
            Some((_, run_end, run_hits)) => {
                *run_end = *end;
                run_hits.extend(hits);
            }
            None => run = Some((*start, *end, hits.into_iter().collect())),
        }
    }
    close(&mut run);

    let (start, end, hits) = best?;
    Span::from_range(
        &dimension.id,
        pitch,
        start,
        end,
        keyword_confidence(hits),
        SpanSource::Keywords,
    )
}

fn keyword_confidence(distinct_hits: usize) -> f64 {
    match distinct_hits {
        0 => 0.0,
        1 => 0.4,
        2 => 0.6,
        _ => 0.8,
    }
}
