use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    HighIntent,
    Pricing,
    Greeting,
    Other,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighIntent => "high_intent",
            Self::Pricing => "pricing",
            Self::Greeting => "greeting",
            Self::Other => "other",
        }
    }
}

const HIGH_INTENT_PHRASES: &[&str] = &[
    "sign up",
    "signup",
    "i want to sign",
    "i want to try",
    "i want to sign up",
    "i'll take",
    "i will take",
    "i want to subscribe",
    "subscribe",
    "buy",
    "get started",
    "get pro",
    "start trial",
    "pro plan",
    "i want the pro",
    "i want pro",
];

const PRICING_PHRASES: &[&str] =
    &["price", "pricing", "cost", "plan", "features", "basic plan", "pro plan"];

const GREETING_PHRASES: &[&str] = &["hi", "hello", "hey", "good morning", "good evening"];

const POLICY_PHRASES: &[&str] = &["refund", "support", "policy"];

/// Checked top to bottom; the first group with a matching phrase wins.
const INTENT_GROUPS: [(Intent, &[&str]); 3] = [
    (Intent::HighIntent, HIGH_INTENT_PHRASES),
    (Intent::Pricing, PRICING_PHRASES),
    (Intent::Greeting, GREETING_PHRASES),
];

/// Case-insensitive substring classifier over ordered keyword groups.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, text: &str) -> Intent {
        let normalized_text = normalize_text(text);
        INTENT_GROUPS
            .iter()
            .find(|(_, phrases)| contains_any(&normalized_text, phrases))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::Other)
    }

    /// Whether a pricing question is really about refunds or support.
    pub fn mentions_policy(&self, text: &str) -> bool {
        contains_any(&normalize_text(text), POLICY_PHRASES)
    }
}

fn normalize_text(text: &str) -> String {
    text.to_lowercase()
}

fn contains_any(normalized_text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| normalized_text.contains(phrase))
}
