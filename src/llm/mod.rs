// ── Infrastructure ───────────────────────────────────────────────────────────
pub mod scrub;
pub mod traits;
mod types;

// ── Decorator layers ────────────────────────────────────────────────────────
pub mod factory;
pub mod reliable;

// ── Provider implementations ────────────────────────────────────────────────
pub mod compatible;

pub use compatible::{OpenAiCompatibleProvider, chat_completions_url};
pub use factory::{create_provider, create_resilient_provider, resolve_api_key};
pub use reliable::ReliableProvider;
pub use scrub::{sanitize_api_error, scrub_secret_patterns};
pub use traits::{GenerateFuture, Provider};
