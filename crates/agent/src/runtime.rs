use std::sync::Arc;

use autostream_core::{
    ConversationState, DialoguePhase, FlowEngine, Intent, KnowledgeBase, LeadCaptureFlow,
    TurnAction,
};
use tracing::{debug, info, warn};

use crate::fallback::{FallbackFailure, FallbackResponder};
use crate::tools::LeadCapture;

/// Receives agent utterances one at a time, in the order they are produced.
pub trait ReplySink {
    fn send(&mut self, utterance: &str);
}

impl ReplySink for Vec<String> {
    fn send(&mut self, utterance: &str) {
        self.push(utterance.to_string());
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    pub from: DialoguePhase,
    pub to: DialoguePhase,
    pub intent: Option<Intent>,
    pub replies: Vec<String>,
    pub captured: bool,
}

/// Drives one session's dialogue turn by turn. The caller owns the
/// [`ConversationState`] and passes it in for every turn.
pub struct DialogueController {
    engine: FlowEngine<LeadCaptureFlow>,
    knowledge: Arc<KnowledgeBase>,
    fallback: FallbackResponder,
    capture: Arc<dyn LeadCapture>,
}

impl DialogueController {
    pub fn new(
        knowledge: Arc<KnowledgeBase>,
        fallback: FallbackResponder,
        capture: Arc<dyn LeadCapture>,
    ) -> Self {
        Self { engine: FlowEngine::default(), knowledge, fallback, capture }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn fallback_available(&self) -> bool {
        self.fallback.is_available()
    }

    pub async fn handle_turn<S>(
        &self,
        state: &mut ConversationState,
        user_text: &str,
        sink: &mut S,
    ) -> TurnReport
    where
        S: ReplySink + ?Sized,
    {
        let user_text = user_text.trim();
        let correlation_id = state.session_id().to_string();
        let outcome = self.engine.apply(state.phase(), state.lead(), user_text);

        // Commit before any action runs: the capture below must already see an
        // idle session with an empty record.
        state.apply_transition(outcome.to, outcome.lead);

        let mut replies = Vec::with_capacity(outcome.actions.len());
        let mut captured = false;
        for action in outcome.actions {
            let (history_user_text, reply) = match action {
                TurnAction::Reply(text) => (user_text, text),
                TurnAction::AnswerPricing => (user_text, self.knowledge.pricing_answer()),
                TurnAction::AnswerPolicy => (user_text, self.knowledge.policy_answer()),
                TurnAction::DelegateToFallback => {
                    (user_text, self.fallback_reply(user_text, &correlation_id).await)
                }
                TurnAction::CaptureLead(lead) => {
                    self.capture.capture(&lead);
                    captured = true;
                    info!(
                        event_name = "lead.captured",
                        correlation_id = %correlation_id,
                        tool = self.capture.name(),
                        platform = %lead.platform,
                        "lead capture tool invoked"
                    );
                    continue;
                }
                TurnAction::FollowUp(text) => ("", text),
            };

            sink.send(&reply);
            state.record_turn(history_user_text, reply.clone());
            replies.push(reply);
        }

        debug!(
            event_name = "dialogue.turn_handled",
            correlation_id = %correlation_id,
            from = ?outcome.from,
            to = ?outcome.to,
            intent = outcome.intent.map(|intent| intent.as_str()).unwrap_or("none"),
            replies = replies.len(),
            captured,
            "dialogue turn handled"
        );

        TurnReport { from: outcome.from, to: outcome.to, intent: outcome.intent, replies, captured }
    }

    async fn fallback_reply(&self, prompt: &str, correlation_id: &str) -> String {
        match self.fallback.respond(prompt).await {
            Ok(text) => text,
            Err(failure) => {
                match &failure {
                    FallbackFailure::Unavailable => debug!(
                        event_name = "fallback.degraded",
                        correlation_id,
                        reason_code = failure.reason_code(),
                        "fallback responder not configured"
                    ),
                    FallbackFailure::Provider(error) => warn!(
                        event_name = "fallback.degraded",
                        correlation_id,
                        reason_code = failure.reason_code(),
                        error = %error,
                        "fallback responder failed"
                    ),
                }
                failure.user_message().to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use autostream_core::{
        messages, CompletedLead, ConversationState, DialoguePhase, FieldName, Intent,
        KnowledgeBase,
    };

    use super::{DialogueController, ReplySink};
    use crate::fallback::FallbackResponder;
    use crate::llm::{LlmClient, LlmError};
    use crate::tools::{InMemoryLeadCapture, LeadCapture};

    fn knowledge_fixture() -> Arc<KnowledgeBase> {
        let knowledge = serde_json::from_str(
            r#"{
                "pricing": {
                    "basic": {"price": "$9", "videos": "10 videos/month", "resolution": "720p"},
                    "pro": {"price": "$29", "videos": "Unlimited videos", "resolution": "4K",
                            "features": ["AI captions"]}
                },
                "policies": {"refund": "No refunds after 7 days", "support": "24/7 on Pro"}
            }"#,
        )
        .expect("fixture parses");
        Arc::new(knowledge)
    }

    fn controller(capture: Arc<dyn LeadCapture>, fallback: FallbackResponder) -> DialogueController {
        DialogueController::new(knowledge_fixture(), fallback, capture)
    }

    struct CannedClient(&'static str);

    #[async_trait]
    impl LlmClient for CannedClient {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    struct BrokenClient;

    #[async_trait]
    impl LlmClient for BrokenClient {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            Err(LlmError::EmptyResponse)
        }
    }

    /// Shared log written by both the reply sink and the capture tool.
    #[derive(Clone, Default)]
    struct Transcript(Arc<Mutex<Vec<String>>>);

    impl Transcript {
        fn lines(&self) -> Vec<String> {
            self.0.lock().map(|lines| lines.clone()).unwrap_or_default()
        }
    }

    impl ReplySink for Transcript {
        fn send(&mut self, utterance: &str) {
            if let Ok(mut lines) = self.0.lock() {
                lines.push(utterance.to_string());
            }
        }
    }

    impl LeadCapture for Transcript {
        fn name(&self) -> &'static str {
            "transcript"
        }

        fn capture(&self, lead: &CompletedLead) {
            if let Ok(mut lines) = self.0.lock() {
                lines.push(format!("captured {}, {}, {}", lead.name, lead.email, lead.platform));
            }
        }
    }

    #[tokio::test]
    async fn greeting_reply_is_fixed_and_recorded() {
        let controller = controller(Arc::new(InMemoryLeadCapture::default()), FallbackResponder::unavailable());
        let mut state = ConversationState::default();
        let mut sink = Vec::new();

        let report = controller.handle_turn(&mut state, "  hello ", &mut sink).await;

        assert_eq!(report.intent, Some(Intent::Greeting));
        assert_eq!(sink, vec![messages::GREETING.to_string()]);
        assert_eq!(state.phase(), DialoguePhase::Idle);
        let turn = state.history().latest().expect("turn recorded");
        assert_eq!(turn.user, "hello");
        assert_eq!(turn.agent, messages::GREETING);
    }

    #[tokio::test]
    async fn pricing_and_policy_answers_come_from_knowledge() {
        let controller = controller(Arc::new(InMemoryLeadCapture::default()), FallbackResponder::unavailable());
        let mut state = ConversationState::default();

        let pricing = controller.handle_turn(&mut state, "what's the price?", &mut Vec::new()).await;
        assert_eq!(
            pricing.replies,
            vec!["Basic Plan: $9 , 10 videos/month , 720p\n\
                  Pro Plan: $29 , Unlimited videos , 4K (Features: AI captions)"
                .to_string()]
        );

        let policy = controller
            .handle_turn(&mut state, "what's the refund policy for the basic plan?", &mut Vec::new())
            .await;
        assert_eq!(
            policy.replies,
            vec!["Refund policy: No refunds after 7 days. Support: 24/7 on Pro.".to_string()]
        );
    }

    #[tokio::test]
    async fn fallback_text_is_used_verbatim() {
        let controller = controller(
            Arc::new(InMemoryLeadCapture::default()),
            FallbackResponder::new(Arc::new(CannedClient("We export in 4K on Pro."))),
        );
        let mut state = ConversationState::default();

        let report = controller.handle_turn(&mut state, "can I export in 4k?", &mut Vec::new()).await;
        assert_eq!(report.intent, Some(Intent::Other));
        assert_eq!(report.replies, vec!["We export in 4K on Pro.".to_string()]);
    }

    #[tokio::test]
    async fn fallback_failures_are_absorbed() {
        let broken = controller(
            Arc::new(InMemoryLeadCapture::default()),
            FallbackResponder::new(Arc::new(BrokenClient)),
        );
        let missing =
            controller(Arc::new(InMemoryLeadCapture::default()), FallbackResponder::unavailable());
        let mut state = ConversationState::default();

        let report = broken.handle_turn(&mut state, "what can you do?", &mut Vec::new()).await;
        assert_eq!(report.replies, vec![messages::FALLBACK_ERROR.to_string()]);

        let report = missing.handle_turn(&mut state, "what can you do?", &mut Vec::new()).await;
        assert_eq!(report.replies, vec![messages::FALLBACK_UNAVAILABLE.to_string()]);
        assert!(!missing.fallback_available());
    }

    #[tokio::test]
    async fn completing_turn_emits_ack_capture_closing_in_order() {
        let transcript = Transcript::default();
        let controller = controller(Arc::new(transcript.clone()), FallbackResponder::unavailable());
        let mut state = ConversationState::default();
        let mut sink = transcript.clone();

        for input in ["I want to sign up", "Jane Doe", "jane@doe.com"] {
            controller.handle_turn(&mut state, input, &mut sink).await;
        }
        let report = controller.handle_turn(&mut state, "YouTube", &mut sink).await;

        assert!(report.captured);
        assert_eq!(report.to, DialoguePhase::Idle);
        assert!(state.pending_field().is_none());
        assert!(state.lead().is_empty());

        let lines = transcript.lines();
        assert_eq!(
            &lines[lines.len() - 3..],
            &[
                "Thanks Jane Doe! Submitting your details now...".to_string(),
                "captured Jane Doe, jane@doe.com, YouTube".to_string(),
                messages::POST_CAPTURE.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn completing_turn_records_two_history_entries() {
        let controller = controller(Arc::new(InMemoryLeadCapture::default()), FallbackResponder::unavailable());
        let mut state = ConversationState::new(10);

        for input in ["sign up", "Jane Doe", "jane@doe.com", "Instagram"] {
            controller.handle_turn(&mut state, input, &mut Vec::new()).await;
        }

        let turns = state.history().iter().collect::<Vec<_>>();
        assert_eq!(turns.len(), 5);
        assert_eq!(turns[3].user, "Instagram");
        assert_eq!(turns[3].agent, "Thanks Jane Doe! Submitting your details now...");
        assert_eq!(turns[4].user, "");
        assert_eq!(turns[4].agent, messages::POST_CAPTURE);
    }

    #[tokio::test]
    async fn invalid_email_keeps_collecting_email() {
        let capture = Arc::new(InMemoryLeadCapture::default());
        let controller = controller(capture.clone(), FallbackResponder::unavailable());
        let mut state = ConversationState::default();

        controller.handle_turn(&mut state, "sign up", &mut Vec::new()).await;
        controller.handle_turn(&mut state, "Jane Doe", &mut Vec::new()).await;
        let report = controller.handle_turn(&mut state, "not-an-email", &mut Vec::new()).await;

        assert_eq!(report.replies, vec![messages::INVALID_EMAIL.to_string()]);
        assert_eq!(state.pending_field(), Some(FieldName::Email));
        assert_eq!(state.lead().len(), 1);
        assert_eq!(state.history().len(), 3);
        assert!(capture.is_empty());
    }
}
