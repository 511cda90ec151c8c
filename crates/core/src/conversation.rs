use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::flows::DialoguePhase;
use crate::lead::{FieldName, LeadRecord};

pub const DEFAULT_HISTORY_CAPACITY: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub user: String,
    pub agent: String,
    pub recorded_at: DateTime<Utc>,
}

/// Fixed-capacity FIFO of recent turns; pushing at capacity evicts the oldest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnHistory {
    capacity: usize,
    turns: VecDeque<Turn>,
}

impl TurnHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity, turns: VecDeque::with_capacity(capacity) }
    }

    pub fn push(&mut self, user: impl Into<String>, agent: impl Into<String>) -> Option<Turn> {
        let turn = Turn { user: user.into(), agent: agent.into(), recorded_at: Utc::now() };
        if self.capacity == 0 {
            return Some(turn);
        }

        let evicted =
            if self.turns.len() >= self.capacity { self.turns.pop_front() } else { None };
        self.turns.push_back(turn);
        evicted
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn latest(&self) -> Option<&Turn> {
        self.turns.back()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }
}

impl Default for TurnHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

/// Per-session dialogue state, owned by whoever drives the controller.
#[derive(Clone, Debug)]
pub struct ConversationState {
    session_id: Uuid,
    pending_field: Option<FieldName>,
    lead: LeadRecord,
    history: TurnHistory,
}

impl ConversationState {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            pending_field: None,
            lead: LeadRecord::default(),
            history: TurnHistory::with_capacity(history_capacity),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn pending_field(&self) -> Option<FieldName> {
        self.pending_field
    }

    pub fn phase(&self) -> DialoguePhase {
        DialoguePhase::from_pending(self.pending_field)
    }

    pub fn lead(&self) -> &LeadRecord {
        &self.lead
    }

    pub fn history(&self) -> &TurnHistory {
        &self.history
    }

    /// Replaces the phase and the lead record together so no reader ever
    /// observes one updated without the other.
    pub fn apply_transition(&mut self, phase: DialoguePhase, lead: LeadRecord) {
        debug_assert!(
            phase == DialoguePhase::Idle || lead.len() < FieldName::COLLECTION_ORDER.len(),
            "a complete lead must be submitted, not left pending"
        );
        self.pending_field = phase.pending_field();
        self.lead = lead;
    }

    pub fn record_turn(&mut self, user: impl Into<String>, agent: impl Into<String>) {
        self.history.push(user, agent);
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
