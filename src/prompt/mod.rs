mod engine;
mod templates;

pub use engine::TeraEngine;
pub use templates::{EXTRACT_TEMPLATE, PromptLibrary, SCORE_TEMPLATE};
