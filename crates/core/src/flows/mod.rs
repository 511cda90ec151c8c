pub mod engine;
pub mod states;

pub use engine::{FlowDefinition, FlowEngine, LeadCaptureFlow};
pub use states::{DialoguePhase, TransitionOutcome, TurnAction};
