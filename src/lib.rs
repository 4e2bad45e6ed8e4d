#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

pub mod config;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod gateway;
pub mod llm;
pub mod prompt;
pub mod rubric;
pub mod session;

pub use config::Config;
pub use engine::Evaluator;
pub use error::{PitchError, Result};
pub use feedback::FeedbackReport;
pub use session::SessionManager;
