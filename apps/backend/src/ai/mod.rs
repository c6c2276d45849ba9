//! Move providers and move acquisition.
//!
//! A provider is an external LLM that, given a position and its legal moves in
//! SAN, answers with free text. [`MoveAcquirer`] turns that text into a legal
//! move, retrying and finally falling back to a random choice.

mod acquisition;
pub mod anthropic;
pub mod openai;
mod prompt;
mod registry;
mod trait_def;

pub use acquisition::{
    match_suggestion, Acquisition, AttemptOutcome, MoveAcquirer, MoveAttempt, Resolution,
    MAX_ATTEMPTS,
};
pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;
pub use registry::ProviderRegistry;
pub use trait_def::{MoveProvider, MoveRequest, PlayerId, ProviderError};
