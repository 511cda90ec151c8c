use std::sync::Arc;

use autostream_agent::{DialogueController, FallbackResponder, GeminiClient, LeadCapture, LlmError};
use autostream_core::config::{AppConfig, ConfigError, LoadOptions};
use autostream_core::{KnowledgeBase, KnowledgeError};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub controller: DialogueController,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),
    #[error("fallback client setup failed: {0}")]
    Fallback(#[source] LlmError),
    #[error("async runtime setup failed: {0}")]
    Runtime(#[source] std::io::Error),
}

impl StartupError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_validation",
            Self::Knowledge(_) => "knowledge_document",
            Self::Fallback(_) => "llm_client",
            Self::Runtime(_) => "runtime",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Knowledge(_) => 3,
            Self::Fallback(_) | Self::Runtime(_) => 4,
        }
    }
}

pub fn load_config(options: LoadOptions) -> Result<AppConfig, StartupError> {
    Ok(AppConfig::load(options)?)
}

/// Loads the knowledge document and wires the controller. Call after logging
/// is initialised so the readiness event is emitted.
pub fn bootstrap_with_config(
    config: AppConfig,
    capture: Arc<dyn LeadCapture>,
) -> Result<Application, StartupError> {
    let knowledge = KnowledgeBase::load(&config.knowledge.path)?;
    info!(
        event_name = "system.bootstrap.knowledge_loaded",
        correlation_id = "bootstrap",
        path = %config.knowledge.path.display(),
        "knowledge document loaded"
    );

    let fallback = match GeminiClient::from_config(&config.llm).map_err(StartupError::Fallback)? {
        Some(client) => FallbackResponder::new(Arc::new(client)),
        None => FallbackResponder::unavailable(),
    };
    info!(
        event_name = "system.bootstrap.fallback_configured",
        correlation_id = "bootstrap",
        fallback_mode = if fallback.is_available() { "gemini" } else { "unavailable" },
        model = %config.llm.model,
        "fallback responder configured"
    );

    let controller = DialogueController::new(Arc::new(knowledge), fallback, capture);
    Ok(Application { config, controller })
}
