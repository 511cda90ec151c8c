use std::sync::Arc;

use autostream_core::messages;
use thiserror::Error;

use crate::llm::{LlmClient, LlmError};

#[derive(Debug, Error)]
pub enum FallbackFailure {
    #[error("no free-text responder is configured")]
    Unavailable,
    #[error(transparent)]
    Provider(#[from] LlmError),
}

impl FallbackFailure {
    /// Degraded-mode reply substituted for a failed fallback.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Unavailable => messages::FALLBACK_UNAVAILABLE,
            Self::Provider(_) => messages::FALLBACK_ERROR,
        }
    }

    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::Unavailable => "fallback_unavailable",
            Self::Provider(_) => "fallback_provider_error",
        }
    }
}

/// Free-text responder used when no scripted intent matches.
#[derive(Clone, Default)]
pub struct FallbackResponder {
    client: Option<Arc<dyn LlmClient>>,
}

impl FallbackResponder {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client: Some(client) }
    }

    pub fn unavailable() -> Self {
        Self { client: None }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    pub async fn respond(&self, prompt: &str) -> Result<String, FallbackFailure> {
        let client = self.client.as_ref().ok_or(FallbackFailure::Unavailable)?;
        Ok(client.complete(prompt).await?)
    }
}
