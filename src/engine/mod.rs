//! The evaluation pipeline: decomposition, scoring and per-session call
//! admission.

mod budget;
mod decomposer;
mod pipeline;
mod scorer;
mod text;
mod types;

pub use budget::{CallBudget, CallGate};
pub use decomposer::Decomposer;
pub use pipeline::Evaluator;
pub use scorer::{ScoreReply, Scorer, parse_score_reply};
pub use types::{Decomposition, Evaluation, EvaluationStatus, Span, SpanSource};

pub(crate) use text::first_sentence;
