//! Fixed agent utterances. Callers and tests match these byte for byte.

pub const ASK_NAME: &str = "Great — what's your full name?";
pub const ASK_EMAIL: &str = "Thanks. What's your email?";
pub const ASK_PLATFORM: &str = "Which creator platform do you use? (YouTube, Instagram, etc.)";
pub const INVALID_EMAIL: &str =
    "That doesn't look like a valid email. Please provide a valid email address.";
pub const POST_CAPTURE: &str = "Done — our team will reach out soon. Would you like a setup guide?";
pub const GREETING: &str = "👋 Hi! I can tell you about pricing or help you sign up for Pro.";
pub const HIGH_INTENT_ENTRY: &str = "Awesome — I can help get you started. What's your full name?";
pub const FALLBACK_UNAVAILABLE: &str =
    "I can help with pricing or sign-up. Ask 'Tell me about pricing' or 'I want to sign up for Pro'.";
pub const FALLBACK_ERROR: &str =
    "Sorry — temporary LLM error. I can still help with pricing or sign-up.";

pub fn funnel_complete(name: &str) -> String {
    format!("Thanks {name}! Submitting your details now...")
}
