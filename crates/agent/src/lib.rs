//! Agent runtime for the AutoStream sales assistant.
//!
//! This crate wires the deterministic dialogue flow from `autostream-core` to
//! the outside world:
//! - `runtime` - `DialogueController`, which runs one turn at a time
//! - `fallback` - free-text replies for messages no scripted intent covers
//! - `llm` - the `LlmClient` seam and the Gemini `generateContent` client
//! - `tools` - the `LeadCapture` side effect fired when the funnel completes
//!
//! # Turn Loop
//!
//! 1. **Transition** - the core flow decides the next phase and the actions
//! 2. **Commit** - phase and lead record are written to the session state
//! 3. **Actions** - replies are rendered and sent, the capture tool runs
//!
//! The LLM only ever phrases free-text answers. It never decides intent,
//! validates fields or triggers a capture.

pub mod fallback;
pub mod llm;
pub mod runtime;
pub mod tools;

pub use fallback::{FallbackFailure, FallbackResponder};
pub use llm::{GeminiClient, LlmClient, LlmError};
pub use runtime::{DialogueController, ReplySink, TurnReport};
pub use tools::{InMemoryLeadCapture, LeadCapture};
