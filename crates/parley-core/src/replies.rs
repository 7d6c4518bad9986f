//! Fixed user-facing reply strings.
//!
//! Every failure mode resolves to one of these displayable strings delivered
//! through the normal `answer` channel — no error ever reaches a client as a
//! fault.

/// Warning emitted when the submitted question is empty or whitespace-only.
pub const INVALID_QUESTION: &str = "⚠️ Please provide a valid question.";

/// Transient progress notice emitted before the provider is consulted.
pub const THINKING: &str = "Thinking...";

/// Fallback when the provider returns a response with no usable content.
pub const NO_ANSWER: &str = "No answer found.";

/// Prefix for answers built from a provider failure.
pub const ERROR_PREFIX: &str = "Sorry, I couldn't process your request. Error: ";

/// Generic fallback when request handling fails outside the relay boundary.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred. Please try again.";

/// Build the user-facing answer for a provider failure description.
pub fn provider_failure(message: &str) -> String {
    format!("{ERROR_PREFIX}{message}")
}
