use serde::{Deserialize, Serialize};

use crate::intent::Intent;
use crate::lead::{CompletedLead, FieldName, LeadRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialoguePhase {
    Idle,
    Collecting(FieldName),
}

impl DialoguePhase {
    pub fn from_pending(pending_field: Option<FieldName>) -> Self {
        match pending_field {
            Some(field) => Self::Collecting(field),
            None => Self::Idle,
        }
    }

    pub fn pending_field(&self) -> Option<FieldName> {
        match self {
            Self::Idle => None,
            Self::Collecting(field) => Some(*field),
        }
    }
}

/// Work the controller performs after committing a transition, in order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnAction {
    /// Fixed reply, recorded in history against the user's text.
    Reply(String),
    AnswerPricing,
    AnswerPolicy,
    DelegateToFallback,
    CaptureLead(CompletedLead),
    /// Extra utterance after the capture, recorded against empty user text.
    FollowUp(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: DialoguePhase,
    pub to: DialoguePhase,
    /// `None` while collecting; intent is only classified from `Idle`.
    pub intent: Option<Intent>,
    pub lead: LeadRecord,
    pub actions: Vec<TurnAction>,
}
