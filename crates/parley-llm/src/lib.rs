//! # parley-llm
//!
//! Completion provider client and the answer relay.
//!
//! [`CompletionClient`] speaks the Groq OpenAI-compatible chat-completions
//! API and surfaces typed [`ProviderError`]s. [`CompletionRelay`] wraps it in
//! a total function: every outcome — success, empty response, or failure —
//! folds into one displayable answer string.

#![deny(unsafe_code)]

pub mod provider;
pub mod relay;
pub mod types;

pub use provider::{
    CompletionClient, CompletionConfig, ProviderError, ProviderResult, DEFAULT_BASE_URL,
    DEFAULT_MODEL,
};
pub use relay::{AnswerSource, CompletionRelay};
