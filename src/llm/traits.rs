use crate::error::LlmError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by [`Provider`] methods.
pub type GenerateFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, LlmError>> + Send + 'a>>;

/// External text-generation capability.
///
/// This is the only suspending boundary of the evaluation engine. Output is
/// treated as untrusted, non-deterministic text; callers parse and validate it.
pub trait Provider: Send + Sync {
    /// Provider identifier (e.g. "openai", "openrouter").
    fn name(&self) -> &str;

    /// Generate a completion for a single prompt, capped at `max_tokens`.
    fn generate<'a>(&'a self, prompt: &'a str, max_tokens: u32) -> GenerateFuture<'a, String>;
}

impl<P: Provider + ?Sized> Provider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn generate<'a>(&'a self, prompt: &'a str, max_tokens: u32) -> GenerateFuture<'a, String> {
        (**self).generate(prompt, max_tokens)
    }
}

impl<P: Provider + ?Sized> Provider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn generate<'a>(&'a self, prompt: &'a str, max_tokens: u32) -> GenerateFuture<'a, String> {
        (**self).generate(prompt, max_tokens)
    }
}
