//! Deterministic core of the AutoStream sales agent: intent classification,
//! knowledge lookup, lead field validation, per-session conversation state and
//! the lead-capture dialogue flow. Nothing here performs I/O beyond loading
//! configuration and the knowledge document at startup.

pub mod config;
pub mod conversation;
pub mod errors;
pub mod flows;
pub mod intent;
pub mod knowledge;
pub mod lead;
pub mod messages;

pub use conversation::{ConversationState, Turn, TurnHistory, DEFAULT_HISTORY_CAPACITY};
pub use errors::DomainError;
pub use flows::{DialoguePhase, FlowEngine, LeadCaptureFlow, TransitionOutcome, TurnAction};
pub use intent::{Intent, IntentClassifier};
pub use knowledge::{KnowledgeBase, KnowledgeError};
pub use lead::{is_valid_email, CompletedLead, FieldName, LeadRecord};
