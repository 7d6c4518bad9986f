//! Answer relay: the total-function boundary over the provider.
//!
//! [`AnswerSource::answer`] never fails. Provider errors fold into the
//! user-facing failure string so the session layer only ever sends
//! displayable text.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use parley_core::replies;

use crate::provider::CompletionClient;

/// Something that turns a validated question into displayable answer text.
///
/// Implementors must be `Send + Sync` so sessions can share one source
/// across tasks.
#[async_trait]
pub trait AnswerSource: Send + Sync {
    /// Answer a question. Infallible: failures become answer text.
    async fn answer(&self, question: &str) -> String;
}

/// [`AnswerSource`] backed by a [`CompletionClient`].
pub struct CompletionRelay {
    /// Shared provider client.
    client: Arc<CompletionClient>,
}

impl CompletionRelay {
    /// Wrap a client in the folding boundary.
    pub fn new(client: Arc<CompletionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnswerSource for CompletionRelay {
    async fn answer(&self, question: &str) -> String {
        match self.client.complete(question).await {
            Ok(text) => {
                debug!(model = %self.client.model(), "completion succeeded");
                text
            }
            Err(e) => {
                error!(
                    category = e.category(),
                    error = %e,
                    "completion failed"
                );
                replies::provider_failure(&e.message())
            }
        }
    }
}
