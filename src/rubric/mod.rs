//! Rubric catalog: the fixed set of pitch dimensions every revision is
//! evaluated against.
//!
//! Declared order matters. It is the order of evaluations inside a revision,
//! of entries in a feedback report, and the tie-break when priorities share a
//! score.

mod defaults;

pub use defaults::default_rubric;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// One axis of evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricDimension {
    pub id: String,
    pub label: String,
    pub description: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Scoring guidance embedded in the scoring prompt.
    #[serde(default)]
    pub guidance: String,
    /// Lowercase keywords for heuristic matching. A trailing `*` matches any
    /// word with that prefix; multi-word entries match consecutive words.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Extra section headings that introduce this dimension.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Advice surfaced when the pitch says nothing about this dimension.
    #[serde(default)]
    pub missing_hint: String,
}

fn default_weight() -> f64 {
    1.0
}

impl RubricDimension {
    /// Minimal dimension with default weight and no heuristics.
    pub fn new(id: &str, label: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            weight: default_weight(),
            guidance: String::new(),
            keywords: Vec::new(),
            aliases: Vec::new(),
            missing_hint: String::new(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Headings that open a section for this dimension: id, label, aliases.
    pub fn headings(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.id.replace('_', " "))
            .chain(std::iter::once(self.label.clone()))
            .chain(self.aliases.iter().cloned())
            .map(|h| h.trim().to_lowercase())
            .filter(|h| !h.is_empty())
    }
}

/// Validated, ordered set of dimensions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rubric {
    dimensions: Vec<RubricDimension>,
}

impl Rubric {
    pub fn new(dimensions: Vec<RubricDimension>) -> Result<Self, ConfigError> {
        if dimensions.is_empty() {
            return Err(ConfigError::Rubric(
                "rubric must declare at least one dimension".into(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for dimension in &dimensions {
            let id = dimension.id.trim();
            if id.is_empty() {
                return Err(ConfigError::Rubric("dimension id must not be blank".into()));
            }
            if id != dimension.id {
                return Err(ConfigError::Rubric(format!(
                    "dimension id {:?} has surrounding whitespace",
                    dimension.id
                )));
            }
            if !seen.insert(id.to_string()) {
                return Err(ConfigError::Rubric(format!("duplicate dimension id {id}")));
            }
            if !dimension.weight.is_finite() || dimension.weight <= 0.0 {
                return Err(ConfigError::Rubric(format!(
                    "dimension {id} has invalid weight {}",
                    dimension.weight
                )));
            }
        }

        Ok(Self { dimensions })
    }

    pub fn dimensions(&self) -> &[RubricDimension] {
        &self.dimensions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RubricDimension> {
        self.dimensions.iter()
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&RubricDimension> {
        self.dimensions.iter().find(|d| d.id == id)
    }

    /// Declared position of `id`, used as the ordering tie-break.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.dimensions.iter().position(|d| d.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(|d| d.id.as_str())
    }
}

impl<'a> IntoIterator for &'a Rubric {
    type Item = &'a RubricDimension;
    type IntoIter = std::slice::Iter<'a, RubricDimension>;

    fn into_iter(self) -> Self::IntoIter {
        self.dimensions.iter()
    }
}
