use crate::flows::states::{DialoguePhase, TransitionOutcome, TurnAction};
use crate::intent::{Intent, IntentClassifier};
use crate::lead::{CompletedLead, FieldName, LeadProgress, LeadRecord};
use crate::messages;

pub trait FlowDefinition {
    fn initial_phase(&self) -> DialoguePhase;
    fn transition(
        &self,
        current: DialoguePhase,
        lead: &LeadRecord,
        user_text: &str,
    ) -> TransitionOutcome;
}

#[derive(Clone, Debug, Default)]
pub struct LeadCaptureFlow {
    classifier: IntentClassifier,
}

impl LeadCaptureFlow {
    pub fn new(classifier: IntentClassifier) -> Self {
        Self { classifier }
    }
}

impl FlowDefinition for LeadCaptureFlow {
    fn initial_phase(&self) -> DialoguePhase {
        DialoguePhase::Idle
    }

    fn transition(
        &self,
        current: DialoguePhase,
        lead: &LeadRecord,
        user_text: &str,
    ) -> TransitionOutcome {
        match current {
            DialoguePhase::Collecting(field) => collect_field(field, lead, user_text),
            DialoguePhase::Idle => route_intent(&self.classifier, lead, user_text),
        }
    }
}

pub struct FlowEngine<F> {
    flow: F,
}

impl<F> FlowEngine<F>
where
    F: FlowDefinition,
{
    pub fn new(flow: F) -> Self {
        Self { flow }
    }

    pub fn initial_phase(&self) -> DialoguePhase {
        self.flow.initial_phase()
    }

    pub fn apply(
        &self,
        current: DialoguePhase,
        lead: &LeadRecord,
        user_text: &str,
    ) -> TransitionOutcome {
        self.flow.transition(current, lead, user_text.trim())
    }
}

impl Default for FlowEngine<LeadCaptureFlow> {
    fn default() -> Self {
        Self::new(LeadCaptureFlow::default())
    }
}

fn collect_field(field: FieldName, lead: &LeadRecord, user_text: &str) -> TransitionOutcome {
    let from = DialoguePhase::Collecting(field);
    let value = match field.validate(user_text) {
        Ok(value) => value,
        Err(error) => {
            return TransitionOutcome {
                from,
                to: from,
                intent: None,
                lead: lead.clone(),
                actions: vec![TurnAction::Reply(error.user_message().to_string())],
            };
        }
    };

    let mut updated = lead.clone();
    updated.insert(field, value);

    match updated.into_progress() {
        LeadProgress::Missing { record, next } => TransitionOutcome {
            from,
            to: DialoguePhase::Collecting(next),
            intent: None,
            lead: record,
            actions: vec![TurnAction::Reply(next.prompt().to_string())],
        },
        LeadProgress::Complete(completed) => complete_funnel(from, completed),
    }
}

// The outcome leaves the session idle with an empty record; the controller
// commits that before it runs the capture action.
fn complete_funnel(from: DialoguePhase, completed: CompletedLead) -> TransitionOutcome {
    TransitionOutcome {
        from,
        to: DialoguePhase::Idle,
        intent: None,
        lead: LeadRecord::default(),
        actions: vec![
            TurnAction::Reply(messages::funnel_complete(&completed.name)),
            TurnAction::CaptureLead(completed),
            TurnAction::FollowUp(messages::POST_CAPTURE.to_string()),
        ],
    }
}

fn route_intent(
    classifier: &IntentClassifier,
    lead: &LeadRecord,
    user_text: &str,
) -> TransitionOutcome {
    let intent = classifier.classify(user_text);
    let (to, lead, action) = match intent {
        Intent::Greeting => {
            (DialoguePhase::Idle, lead.clone(), TurnAction::Reply(messages::GREETING.to_string()))
        }
        Intent::Pricing if classifier.mentions_policy(user_text) => {
            (DialoguePhase::Idle, lead.clone(), TurnAction::AnswerPolicy)
        }
        Intent::Pricing => (DialoguePhase::Idle, lead.clone(), TurnAction::AnswerPricing),
        Intent::HighIntent => (
            DialoguePhase::Collecting(FieldName::Name),
            LeadRecord::default(),
            TurnAction::Reply(messages::HIGH_INTENT_ENTRY.to_string()),
        ),
        Intent::Other => (DialoguePhase::Idle, lead.clone(), TurnAction::DelegateToFallback),
    };

    TransitionOutcome { from: DialoguePhase::Idle, to, intent: Some(intent), lead, actions: vec![action] }
}
