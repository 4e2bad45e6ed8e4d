//! Feedback reports derived from a session's latest revisions.

mod composer;
mod render;
mod types;

pub use composer::compose;
pub use render::render_text;
pub use types::{Coverage, CoverageLevel, DimensionFeedback, FeedbackReport, Verdict};
