use crate::error::ConfigError;
use crate::rubric::{Rubric, RubricDimension, default_rubric};
use serde::{Deserialize, Serialize};

/// Optional rubric override. An empty list keeps the built-in rubric.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RubricConfig {
    #[serde(default)]
    pub dimensions: Vec<RubricDimension>,
}

impl RubricConfig {
    pub fn build(&self) -> Result<Rubric, ConfigError> {
        if self.dimensions.is_empty() {
            return Ok(default_rubric());
        }
        Rubric::new(self.dimensions.clone())
    }
}
